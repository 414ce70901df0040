use serde::Serialize;
use thiserror::Error;

use crate::domain::{InvoiceId, ValidationError};

/// Typed failure of a ledger operation. Every operation returns either a
/// success value or exactly one of these; nothing is swallowed or retried.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    #[error("Company already exists: {0}")]
    CompanyExists(String),

    #[error("Company '{code}' is still referenced by {count} invoice(s)")]
    CompanyHasInvoices { code: String, count: i64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Transport-agnostic classification of a failure. The transport layer maps
/// each kind to whatever status its protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-domain input; caller-correctable.
    Validation,
    /// Referenced entity does not exist; caller-correctable.
    NotFound,
    /// Operation would violate a structural invariant.
    Conflict,
    /// Underlying persistence failed; not the caller's fault.
    Storage,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::CompanyNotFound(_) | AppError::InvoiceNotFound(_) => ErrorKind::NotFound,
            AppError::CompanyExists(_) | AppError::CompanyHasInvoices { .. } => ErrorKind::Conflict,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// The error half of the result envelope handed to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AppError::CompanyNotFound("apple".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(AppError::InvoiceNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(
            AppError::CompanyExists("apple".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::CompanyHasInvoices {
                code: "apple".into(),
                count: 2
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::Validation(ValidationError::EmptyPayload).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_error_body_serialization() {
        let err = AppError::CompanyNotFound("apple".into());
        let body = ErrorBody::from(&err);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["message"], "Company not found: apple");
    }
}
