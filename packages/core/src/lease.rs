// ABOUTME: Lease duration date arithmetic
// ABOUTME: End-date calculation, whole-month counting, and date range validation

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

impl LeaseDuration {
    pub fn months(value: u32) -> Self {
        Self {
            value,
            unit: DurationUnit::Months,
        }
    }

    pub fn years(value: u32) -> Self {
        Self {
            value,
            unit: DurationUnit::Years,
        }
    }

    pub fn total_months(&self) -> u32 {
        match self.unit {
            DurationUnit::Months => self.value,
            DurationUnit::Years => self.value.saturating_mul(12),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaseDateError {
    #[error("End date must be after start date")]
    EndBeforeStart,

    #[error("Lease must be at least one day long")]
    ZeroLength,

    #[error("Invalid date: {0}. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, LeaseDateError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| LeaseDateError::InvalidDate(value.to_string()))
}

/// Last day of a lease that starts on `start` and runs for `duration`.
///
/// The end date is inclusive, so a one-year lease starting 2025-11-01 ends
/// 2026-10-31. Month addition clamps to the end of shorter months.
/// Returns `None` only when the result falls outside chrono's date range.
pub fn calculate_end_date(start: NaiveDate, duration: LeaseDuration) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(duration.total_months()))?
        .checked_sub_days(Days::new(1))
}

/// Whole months covered by the inclusive range `start..=end`.
///
/// Counts the largest `n` where `start + n months` does not pass the day
/// after `end`; a trailing partial month is not counted.
pub fn calculate_duration_months(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    let Some(exclusive_end) = end.succ_opt() else {
        return 0;
    };

    let span = (exclusive_end.year() - start.year()) * 12 + exclusive_end.month() as i32
        - start.month() as i32;
    let mut months = span.max(0) as u32;

    while months > 0 {
        match start.checked_add_months(Months::new(months)) {
            Some(candidate) if candidate <= exclusive_end => break,
            _ => months -= 1,
        }
    }

    months
}

/// Human readable duration, e.g. `"1 year 6 months"`
pub fn format_lease_duration(total_months: u32) -> String {
    let years = total_months / 12;
    let months = total_months % 12;

    let plural = |n: u32, word: &str| {
        if n == 1 {
            format!("1 {}", word)
        } else {
            format!("{} {}s", n, word)
        }
    };

    match (years, months) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}

/// Reject ranges that end before or on the start date
pub fn validate_lease_dates(start: NaiveDate, end: NaiveDate) -> Result<(), LeaseDateError> {
    if end < start {
        return Err(LeaseDateError::EndBeforeStart);
    }
    if end == start {
        return Err(LeaseDateError::ZeroLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_end_date_is_inclusive() {
        assert_eq!(
            calculate_end_date(date("2025-11-01"), LeaseDuration::years(1)),
            Some(date("2026-10-31"))
        );
        assert_eq!(
            calculate_end_date(date("2025-11-01"), LeaseDuration::months(12)),
            Some(date("2026-10-31"))
        );
        assert_eq!(
            calculate_end_date(date("2025-01-15"), LeaseDuration::months(6)),
            Some(date("2025-07-14"))
        );
    }

    #[test]
    fn test_end_date_clamps_short_months() {
        assert_eq!(
            calculate_end_date(date("2025-01-31"), LeaseDuration::months(1)),
            Some(date("2025-02-27"))
        );
        assert_eq!(
            calculate_end_date(date("2024-02-29"), LeaseDuration::years(1)),
            Some(date("2025-02-27"))
        );
    }

    #[test]
    fn test_duration_months() {
        assert_eq!(
            calculate_duration_months(date("2025-01-01"), date("2025-01-31")),
            1
        );
        assert_eq!(
            calculate_duration_months(date("2025-11-01"), date("2026-10-31")),
            12
        );
        assert_eq!(
            calculate_duration_months(date("2025-01-01"), date("2025-01-15")),
            0
        );
        assert_eq!(
            calculate_duration_months(date("2025-01-15"), date("2025-03-20")),
            2
        );
        assert_eq!(
            calculate_duration_months(date("2025-03-01"), date("2025-02-01")),
            0
        );
    }

    #[test]
    fn test_duration_round_trips_end_date() {
        for start in ["2025-01-31", "2025-03-15", "2024-02-29", "2025-12-01"] {
            for months in [1, 3, 6, 11, 12, 24] {
                let start = date(start);
                let end = calculate_end_date(start, LeaseDuration::months(months)).unwrap();
                assert_eq!(
                    calculate_duration_months(start, end),
                    months,
                    "start {} months {}",
                    start,
                    months
                );
            }
        }
    }

    #[test]
    fn test_format_lease_duration() {
        assert_eq!(format_lease_duration(0), "0 months");
        assert_eq!(format_lease_duration(1), "1 month");
        assert_eq!(format_lease_duration(6), "6 months");
        assert_eq!(format_lease_duration(12), "1 year");
        assert_eq!(format_lease_duration(15), "1 year 3 months");
        assert_eq!(format_lease_duration(26), "2 years 2 months");
    }

    #[test]
    fn test_validate_lease_dates() {
        assert_eq!(
            validate_lease_dates(date("2025-05-01"), date("2025-04-30")),
            Err(LeaseDateError::EndBeforeStart)
        );
        assert_eq!(
            validate_lease_dates(date("2025-05-01"), date("2025-05-01")),
            Err(LeaseDateError::ZeroLength)
        );
        assert_eq!(
            validate_lease_dates(date("2025-05-01"), date("2025-05-02")),
            Ok(())
        );
        assert!(!LeaseDateError::ZeroLength.to_string().is_empty());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("01/02/2025").is_err());
    }
}
