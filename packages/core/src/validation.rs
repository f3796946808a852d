// ABOUTME: Input validation primitives for forms
// ABOUTME: Email/phone predicates, password strength scoring, numeric input checks

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid phone regex"));

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const MAX_DECIMAL_PLACES: usize = 2;

/// Check an email address has the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Check a mobile number: ten digits starting 6-9, with an optional
/// `+91`, `91` or `0` prefix. Spaces, dashes and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let local = if let Some(rest) = digits.strip_prefix("+91") {
        rest
    } else if digits.len() == 12 && digits.starts_with("91") {
        &digits[2..]
    } else if digits.len() == 11 && digits.starts_with('0') {
        &digits[1..]
    } else {
        digits.as_str()
    };

    PHONE_REGEX.is_match(local)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

/// Result of scoring a password against the five strength rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    pub score: u8,
    pub has_min_length: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_number: bool,
    pub has_special_char: bool,
    pub is_valid: bool,
    pub label: StrengthLabel,
    pub feedback: Vec<String>,
}

/// Score a password. Each rule contributes one point; four or more is valid.
pub fn check_password_strength(password: &str) -> PasswordStrength {
    let has_min_length = password.chars().count() >= PASSWORD_MIN_LENGTH;
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_number = password.chars().any(|c| c.is_ascii_digit());
    let has_special_char = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    let checks = [
        (has_min_length, "Use at least 8 characters"),
        (has_uppercase, "Add an uppercase letter"),
        (has_lowercase, "Add a lowercase letter"),
        (has_number, "Add a number"),
        (has_special_char, "Add a special character"),
    ];

    let score = checks.iter().filter(|(passed, _)| *passed).count() as u8;
    let feedback = checks
        .iter()
        .filter(|(passed, _)| !passed)
        .map(|(_, hint)| hint.to_string())
        .collect();

    let label = match score {
        0..=2 => StrengthLabel::Weak,
        3 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    };

    PasswordStrength {
        score,
        has_min_length,
        has_uppercase,
        has_lowercase,
        has_number,
        has_special_char,
        is_valid: score >= 4,
        label,
        feedback,
    }
}

/// Constraints applied by [`validate_numeric_input`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericInputOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allow_decimal: bool,
    pub allow_negative: bool,
}

impl Default for NumericInputOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            allow_decimal: true,
            allow_negative: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericValidation {
    pub is_valid: bool,
    pub value: Option<f64>,
    pub error: Option<String>,
}

impl NumericValidation {
    fn ok(value: f64) -> Self {
        Self {
            is_valid: true,
            value: Some(value),
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            value: None,
            error: Some(message.into()),
        }
    }
}

/// Validate free-form numeric input. Rules run in a fixed order and only
/// the first violation is reported.
pub fn validate_numeric_input(input: &str, options: &NumericInputOptions) -> NumericValidation {
    let value = input.trim();

    if value.is_empty() {
        return NumericValidation::fail("Please enter a value");
    }

    if value.contains(['e', 'E']) {
        return NumericValidation::fail("Scientific notation is not allowed");
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        return NumericValidation::fail("Only numbers are allowed");
    }

    let minus_count = value.matches('-').count();
    if minus_count > 1 || (minus_count == 1 && !value.starts_with('-')) {
        return NumericValidation::fail("Invalid number format");
    }
    if minus_count == 1 && !options.allow_negative {
        return NumericValidation::fail("Negative values are not allowed");
    }

    if value.matches('.').count() > 1 {
        return NumericValidation::fail("Only one decimal point is allowed");
    }

    if value.contains('.') && !options.allow_decimal {
        return NumericValidation::fail("Decimal values are not allowed");
    }

    let unsigned = value.trim_start_matches('-');
    if unsigned.is_empty() {
        return NumericValidation::fail("Invalid number format");
    }

    if unsigned.starts_with('.') || unsigned.ends_with('.') {
        return NumericValidation::fail("Number cannot start or end with a decimal point");
    }

    if let Some((_, fraction)) = unsigned.split_once('.') {
        if fraction.len() > MAX_DECIMAL_PLACES {
            return NumericValidation::fail(format!(
                "Maximum {} decimal places allowed",
                MAX_DECIMAL_PLACES
            ));
        }
    }

    let parsed = match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return NumericValidation::fail("Invalid number format"),
    };

    if let Some(min) = options.min {
        if parsed < min {
            return NumericValidation::fail(format!("Value must be at least {}", min));
        }
    }

    if let Some(max) = options.max {
        if parsed > max {
            return NumericValidation::fail(format!("Value must be at most {}", max));
        }
    }

    NumericValidation::ok(parsed)
}

/// Strip keystroke noise from numeric input: keeps digits (and the first
/// decimal point when decimals are allowed) and drops leading zeros.
pub fn sanitize_numeric_input(input: &str, allow_decimal: bool) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut seen_dot = false;

    for c in input.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if c == '.' && allow_decimal && !seen_dot {
            seen_dot = true;
            cleaned.push(c);
        }
    }

    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (cleaned.as_str(), None),
    };

    let trimmed = int_part.trim_start_matches('0');
    let int_part = if trimmed.is_empty() && !int_part.is_empty() {
        "0"
    } else {
        trimmed
    };

    match frac_part {
        Some(frac) if int_part.is_empty() => format!("0.{}", frac),
        Some(frac) => format!("{}.{}", int_part, frac),
        None => int_part.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("owner@example.com", true)]
    #[case("first.last@sub.domain.in", true)]
    #[case("  spaced@example.com  ", true)]
    #[case("no-at-sign.com", false)]
    #[case("missing@tld", false)]
    #[case("two@@example.com", false)]
    #[case("white space@example.com", false)]
    fn test_is_valid_email(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(email), expected);
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("+91 98765 43210", true)]
    #[case("919876543210", true)]
    #[case("09876543210", true)]
    #[case("(987) 654-3210", true)]
    #[case("5876543210", false)]
    #[case("987654321", false)]
    #[case("98765432101", false)]
    #[case("98765abc10", false)]
    fn test_is_valid_phone(#[case] phone: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone(phone), expected);
    }

    #[test]
    fn test_password_score_is_sum_of_checks() {
        for password in ["", "abc", "abcdefgh", "Abcdefgh", "Abcdefg1", "Abcdef1!", "A1!"] {
            let s = check_password_strength(password);
            let expected = [
                s.has_min_length,
                s.has_uppercase,
                s.has_lowercase,
                s.has_number,
                s.has_special_char,
            ]
            .iter()
            .filter(|b| **b)
            .count() as u8;
            assert_eq!(s.score, expected, "score mismatch for {:?}", password);
            assert_eq!(s.is_valid, s.score >= 4, "validity mismatch for {:?}", password);
        }
    }

    #[test]
    fn test_password_strength_levels() {
        let weak = check_password_strength("abc");
        assert_eq!(weak.score, 1);
        assert_eq!(weak.label, StrengthLabel::Weak);
        assert!(!weak.is_valid);
        assert_eq!(weak.feedback.len(), 4);

        let medium = check_password_strength("abcdefg1");
        assert_eq!(medium.score, 3);
        assert_eq!(medium.label, StrengthLabel::Medium);
        assert!(!medium.is_valid);

        let valid = check_password_strength("Abcdefg1");
        assert_eq!(valid.score, 4);
        assert!(valid.is_valid);
        assert_eq!(valid.feedback, vec!["Add a special character".to_string()]);

        let strong = check_password_strength("Abcdef1!");
        assert_eq!(strong.score, 5);
        assert_eq!(strong.label, StrengthLabel::Strong);
        assert!(strong.feedback.is_empty());
    }

    #[test]
    fn test_password_special_chars_are_fixed_set() {
        assert!(check_password_strength("a{").has_special_char);
        assert!(!check_password_strength("a_").has_special_char);
        assert!(!check_password_strength("a~").has_special_char);
    }

    #[test]
    fn test_numeric_accepts_plain_values() {
        let options = NumericInputOptions::default();
        assert_eq!(validate_numeric_input("1500", &options).value, Some(1500.0));
        assert_eq!(validate_numeric_input("12.5", &options).value, Some(12.5));
        assert_eq!(validate_numeric_input(" 0.99 ", &options).value, Some(0.99));
    }

    #[rstest]
    #[case("", "Please enter a value")]
    #[case("1e5", "Scientific notation is not allowed")]
    #[case("12a", "Only numbers are allowed")]
    #[case("1-2", "Invalid number format")]
    #[case("-5", "Negative values are not allowed")]
    #[case("1.2.3", "Only one decimal point is allowed")]
    #[case(".5", "Number cannot start or end with a decimal point")]
    #[case("5.", "Number cannot start or end with a decimal point")]
    #[case("1.234", "Maximum 2 decimal places allowed")]
    fn test_numeric_rejections(#[case] input: &str, #[case] message: &str) {
        let result = validate_numeric_input(input, &NumericInputOptions::default());
        assert!(!result.is_valid);
        assert_eq!(result.value, None);
        assert_eq!(result.error.as_deref(), Some(message));
    }

    #[test]
    fn test_numeric_reports_only_first_violation() {
        // Scientific notation wins over the invalid-character rule
        let result = validate_numeric_input("1e5x", &NumericInputOptions::default());
        assert_eq!(
            result.error.as_deref(),
            Some("Scientific notation is not allowed")
        );

        // Duplicate decimal point wins over the decimal-places rule
        let result = validate_numeric_input("1.234.5", &NumericInputOptions::default());
        assert_eq!(
            result.error.as_deref(),
            Some("Only one decimal point is allowed")
        );
    }

    #[test]
    fn test_numeric_decimal_and_negative_options() {
        let integers = NumericInputOptions {
            allow_decimal: false,
            ..Default::default()
        };
        assert_eq!(
            validate_numeric_input("2.5", &integers).error.as_deref(),
            Some("Decimal values are not allowed")
        );

        let signed = NumericInputOptions {
            allow_negative: true,
            ..Default::default()
        };
        assert_eq!(validate_numeric_input("-2.5", &signed).value, Some(-2.5));
        assert_eq!(
            validate_numeric_input("-", &signed).error.as_deref(),
            Some("Invalid number format")
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let options = NumericInputOptions {
            min: Some(1.0),
            max: Some(31.0),
            allow_decimal: false,
            allow_negative: false,
        };
        assert!(validate_numeric_input("1", &options).is_valid);
        assert!(validate_numeric_input("31", &options).is_valid);
        assert_eq!(
            validate_numeric_input("0", &options).error.as_deref(),
            Some("Value must be at least 1")
        );
        assert_eq!(
            validate_numeric_input("32", &options).error.as_deref(),
            Some("Value must be at most 31")
        );
    }

    #[rstest]
    #[case("00abc12.3.4", true, "12.34")]
    #[case("0012", false, "12")]
    #[case("12.5", false, "125")]
    #[case("000", true, "0")]
    #[case("00.50", true, "0.50")]
    #[case(".5", true, "0.5")]
    #[case("1e3", true, "13")]
    #[case("-42", true, "42")]
    #[case("abc", true, "")]
    fn test_sanitize_numeric_input(
        #[case] input: &str,
        #[case] allow_decimal: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(sanitize_numeric_input(input, allow_decimal), expected);
    }
}
