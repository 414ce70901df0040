use thiserror::Error;

use super::Cents;

/// Malformed or out-of-domain input. Always caller-correctable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Field '{field}' must be a decimal number, got '{input}'")]
    NotNumeric { field: String, input: String },

    #[error("Field '{field}' must be a positive amount, got {got}")]
    NonPositiveAmount { field: String, got: Cents },

    #[error("Update payload must include at least one field")]
    EmptyPayload,
}

/// Fail when a required string field is missing or blank after trimming.
pub fn require_non_empty(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(())
}

/// Fail when an amount is zero or negative.
pub fn require_positive_amount(cents: Cents, field: &str) -> Result<(), ValidationError> {
    if cents <= 0 {
        return Err(ValidationError::NonPositiveAmount {
            field: field.to_string(),
            got: cents,
        });
    }
    Ok(())
}

/// Fail when an update payload carries no fields at all.
/// `has_any_field` comes from the patch type's `is_empty`.
pub fn require_some_field(has_any_field: bool) -> Result<(), ValidationError> {
    if !has_any_field {
        return Err(ValidationError::EmptyPayload);
    }
    Ok(())
}
