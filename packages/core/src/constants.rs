// ABOUTME: Domain constants shared across Rentwise packages
// ABOUTME: Trial length, plan sentinels, and default user preferences

/// Length of a free trial in days
pub const TRIAL_DURATION_DAYS: i64 = 14;

/// Billing cycle length used when scheduling the next charge
pub const BILLING_CYCLE_DAYS: i64 = 30;

/// Plan limit value meaning "no limit"
pub const UNLIMITED: i64 = -1;

// Default user settings
pub const DEFAULT_REMINDER_DAYS_BEFORE: i64 = 3;
pub const DEFAULT_QUIET_HOURS_START: &str = "22:00";
pub const DEFAULT_QUIET_HOURS_END: &str = "08:00";
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_CURRENCY: &str = "INR";

// Notifications
pub const LEASE_EXPIRY_WINDOW_DAYS: i64 = 30;
pub const NOTIFICATION_RETENTION_DAYS: i64 = 30;

// Uploads
pub const MAX_UPLOAD_SIZE_BYTES: i64 = 100 * 1024 * 1024;
