// ABOUTME: Per-user settings, login activity, and data export requests for Rentwise
// ABOUTME: Settings rows are created lazily with default preferences on first access

pub mod activity;
pub mod error;
pub mod exports;
pub mod storage;
pub mod types;
pub mod validation;

pub use activity::LoginActivityStorage;
pub use error::{SettingsError, SettingsResult};
pub use exports::ExportStorage;
pub use storage::SettingsStorage;
pub use types::{
    DataExportRequest, ExportStatus, ExportType, LoginActivity, LoginEvent, NewLoginActivity,
    UserSettings, UserSettingsUpdate,
};
pub use validation::{validate_settings_update, SettingsValidationError};
