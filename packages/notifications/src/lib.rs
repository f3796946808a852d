// ABOUTME: Notification materialization for Rentwise
// ABOUTME: Lease-expiry and rent-due reminders generated by a daily scheduled run

pub mod generator;
pub mod types;

pub use generator::{next_rent_due_date, NotificationService};
pub use types::{GenerationSummary, Notification, NotificationKind};
