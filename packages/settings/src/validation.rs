// ABOUTME: Input validation for user settings updates
// ABOUTME: Range, time-of-day, timezone, and currency checks applied before any write

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::types::UserSettingsUpdate;

pub const MAX_REMINDER_DAYS_BEFORE: i64 = 30;

static TIME_OF_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Invalid regex pattern")
});

static TIMEZONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+(/[A-Za-z0-9_+\-]+)+$").expect("Invalid regex pattern")
});

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid regex pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsValidationError {
    #[error("Reminder days must be between 0 and {max}, got {0}", max = MAX_REMINDER_DAYS_BEFORE)]
    ReminderDaysOutOfRange(i64),

    #[error("Invalid time for {field}: {value}. Use 24-hour HH:MM")]
    InvalidTime { field: &'static str, value: String },

    #[error("Invalid timezone: {0}. Use an Area/Location name such as Asia/Kolkata")]
    InvalidTimezone(String),

    #[error("Invalid currency code: {0}. Use a three-letter code such as INR")]
    InvalidCurrency(String),
}

/// Validate every field present in a partial settings update
pub fn validate_settings_update(update: &UserSettingsUpdate) -> Result<(), SettingsValidationError> {
    if let Some(days) = update.reminder_days_before {
        validate_reminder_days(days)?;
    }
    if let Some(start) = &update.quiet_hours_start {
        validate_time_of_day("quiet_hours_start", start)?;
    }
    if let Some(end) = &update.quiet_hours_end {
        validate_time_of_day("quiet_hours_end", end)?;
    }
    if let Some(tz) = &update.timezone {
        validate_timezone(tz)?;
    }
    if let Some(currency) = &update.currency {
        validate_currency(currency)?;
    }
    Ok(())
}

pub fn validate_reminder_days(days: i64) -> Result<(), SettingsValidationError> {
    if (0..=MAX_REMINDER_DAYS_BEFORE).contains(&days) {
        Ok(())
    } else {
        Err(SettingsValidationError::ReminderDaysOutOfRange(days))
    }
}

pub fn validate_time_of_day(field: &'static str, value: &str) -> Result<(), SettingsValidationError> {
    if TIME_OF_DAY_RE.is_match(value) {
        Ok(())
    } else {
        Err(SettingsValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
    }
}

/// Accepts `UTC` or an IANA-style `Area/Location` name
pub fn validate_timezone(value: &str) -> Result<(), SettingsValidationError> {
    if value == "UTC" || TIMEZONE_RE.is_match(value) {
        Ok(())
    } else {
        Err(SettingsValidationError::InvalidTimezone(value.to_string()))
    }
}

pub fn validate_currency(value: &str) -> Result<(), SettingsValidationError> {
    if CURRENCY_RE.is_match(value) {
        Ok(())
    } else {
        Err(SettingsValidationError::InvalidCurrency(value.to_string()))
    }
}
