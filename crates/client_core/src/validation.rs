//! Keystroke validation for the conversion input field.

use shared::{domain::is_convertible, error::Rejection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The raw text, unchanged. Leading zeros survive because the text is the cache key.
    Accepted(String),
    Rejected(Rejection),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Classifies raw input text. Empty input is always accepted so the field can be cleared.
pub fn validate(raw: &str) -> Validation {
    if raw.is_empty() {
        return Validation::Accepted(String::new());
    }

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Validation::Rejected(Rejection::NonNumeric);
    }

    // All digits, so a parse error can only be overflow.
    match raw.parse::<u32>() {
        Ok(value) if is_convertible(value) => Validation::Accepted(raw.to_string()),
        _ => Validation::Rejected(Rejection::OutOfRange),
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
