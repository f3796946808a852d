// ABOUTME: Core validation, lease arithmetic, and utilities for Rentwise
// ABOUTME: Foundational package with pure functions shared across all Rentwise packages

pub mod constants;
pub mod lease;
pub mod utils;
pub mod validation;

// Re-export constants
pub use constants::{
    DEFAULT_CURRENCY, DEFAULT_QUIET_HOURS_END, DEFAULT_QUIET_HOURS_START,
    DEFAULT_REMINDER_DAYS_BEFORE, DEFAULT_TIMEZONE, TRIAL_DURATION_DAYS, UNLIMITED,
};

// Re-export lease arithmetic
pub use lease::{
    calculate_duration_months, calculate_end_date, format_lease_duration, parse_date,
    validate_lease_dates, DurationUnit, LeaseDateError, LeaseDuration,
};

// Re-export utilities
pub use utils::{bytes_to_mb, format_file_size, generate_id};

// Re-export validation
pub use validation::{
    check_password_strength, is_valid_email, is_valid_phone, sanitize_numeric_input,
    validate_numeric_input, NumericInputOptions, NumericValidation, PasswordStrength,
    StrengthLabel,
};
