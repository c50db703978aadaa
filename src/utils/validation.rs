//! Field validation for submitted forms.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

static LETTERS_AND_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern compiles"));

/// One message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Messages collected while validating one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Messages in the order they were raised, as shown above a form.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|error| error.message.clone()).collect()
    }

    /// `Ok(value)` when nothing was raised.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<(&'static str, &str)> for FieldErrors {
    fn from((field, message): (&'static str, &str)) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(field, message);
        errors
    }
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// ASCII letters and digits only, and at least one of them.
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn is_letters_and_spaces(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL.is_match(value)
}

/// At least 8 characters with a lowercase letter, an uppercase letter, a digit and a symbol.
pub fn is_strong_password(value: &str) -> bool {
    char_len(value) >= 8
        && value.chars().any(|c| c.is_lowercase())
        && value.chars().any(|c| c.is_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// Parse an ISO 8601 calendar date or date-time, keeping only the date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.date_naive());
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map(|date_time| date_time.date())
        .ok()
}

/// Validate an optional date field: blank is `Ok(None)`.
pub fn optional_date(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let parsed = parse_iso_date(value);
    if parsed.is_none() {
        errors.push(field, message);
    }
    parsed
}
