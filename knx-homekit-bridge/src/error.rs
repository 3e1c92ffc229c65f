//! Error types for value translation.

use thiserror::Error;

use knx_homekit_common::FieldValue;

/// Result type alias using [`TranslateError`].
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors raised while translating a single value change.
///
/// Unknown fields and unmapped enum codes are not errors; only values whose
/// type cannot carry the field's meaning are rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The value cannot be interpreted for this field.
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl TranslateError {
    /// Create a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Validation error for a value of the wrong kind.
    pub(crate) fn expected(field: &str, expected: &str, value: &FieldValue) -> Self {
        Self::validation(
            field,
            format!("expected {}, got {} '{}'", expected, value.kind(), value),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_message() {
        let err = TranslateError::expected("RotationSpeed", "a number", &FieldValue::from("fast"));
        assert_eq!(
            err.to_string(),
            "Invalid value for RotationSpeed: expected a number, got text 'fast'"
        );
    }
}
