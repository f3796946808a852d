// ABOUTME: Rentwise account lifecycle operations
// ABOUTME: Owner-only account deletion and the outbound signup webhook

pub mod account;
pub mod error;
pub mod webhook;

pub use account::{AccountService, DeletionSummary};
pub use error::{AuthError, AuthResult};
pub use webhook::{SignupPayload, SignupWebhook};
