//! Canonical per-field validation rules.
//!
//! Each function here is a pure predicate over one field value, usable as a
//! `#[validate(custom(...))]` function on the DTOs. Every failure carries a
//! stable machine-readable code (`required`, `too_short`, `invalid_characters`,
//! `invalid_format`, `too_young`, `out_of_range`) plus a human-readable
//! message, so callers can render every problem in a record at once.
//!
//! These rules are the single source of truth: the HTTP layer, the record
//! services and the tests all validate through this module.

use chrono::{Months, NaiveDate, Utc};
use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError};

/// Minimum age, in years, for a student's date of birth.
pub const MIN_AGE_YEARS: u32 = 5;
/// Maximum age, in years, for a student's date of birth.
pub const MAX_AGE_YEARS: u32 = 100;
/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Letters-and-spaces text of at least two characters (names, subjects).
pub fn person_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "This field is required"));
    }
    if trimmed.chars().count() < 2 {
        return Err(invalid("too_short", "Must be at least 2 characters long"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(invalid(
            "invalid_characters",
            "Can only contain letters and spaces",
        ));
    }
    Ok(())
}

/// Free-text address of at least five characters.
pub fn address(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "This field is required"));
    }
    if trimmed.chars().count() < 5 {
        return Err(invalid("too_short", "Must be at least 5 characters long"));
    }
    Ok(())
}

/// Email address in `local@domain.tld` shape.
///
/// Case normalization to lowercase happens at write time in the services,
/// not here; this function only decides validity.
pub fn email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "This field is required"));
    }
    let dotted_domain = trimmed
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !trimmed.validate_email() || !dotted_domain {
        return Err(invalid("invalid_format", "Please enter a valid email"));
    }
    Ok(())
}

/// Phone number containing at least [`MIN_PHONE_DIGITS`] digits.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "This field is required"));
    }
    let digit_count = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count < MIN_PHONE_DIGITS {
        return Err(invalid(
            "too_short",
            "Phone number must be at least 10 digits",
        ));
    }
    Ok(())
}

/// Date of birth inside the accepted age window.
///
/// A date after (today − [`MIN_AGE_YEARS`]) fails `too_young`; this also
/// covers future dates. A date before (today − [`MAX_AGE_YEARS`]) fails
/// `out_of_range`. Both boundary dates are accepted.
pub fn date_of_birth(value: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    let youngest_allowed = today - Months::new(12 * MIN_AGE_YEARS);
    let oldest_allowed = today - Months::new(12 * MAX_AGE_YEARS);

    if *value > youngest_allowed {
        return Err(invalid("too_young", "Must be at least 5 years old"));
    }
    if *value < oldest_allowed {
        return Err(invalid(
            "out_of_range",
            "Please enter a valid date of birth",
        ));
    }
    Ok(())
}
