//! Error types for the leave manager MCP implementation.
//!
//! This module contains the error type shared by the ledger and the tools:
//! - `LeaveError`: business-rule rejections, invalid input and store failures
//! - Conversion from `sqlx::Error` into the store-unavailable case
//! - Conversion to RMCP's `ErrorData` for MCP protocol compliance

use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaveError {
    #[error("Employee ID {0} not found.")]
    NotFound(String),

    #[error("Name does not match for employee ID {0}.")]
    NameMismatch(String),

    #[error(
        "Insufficient leave balance. You requested {requested} day(s) but have only {available}."
    )]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Employee {0} already exists.")]
    AlreadyExists(String),

    #[error("Please provide either employee ID or name.")]
    MissingCriteria,

    #[error("No employee found with the name '{0}'.")]
    NameNotFound(String),

    #[error(
        "Multiple employees found with the name '{name}'. Please specify the employee ID. IDs: {}",
        .ids.join(", ")
    )]
    AmbiguousName { name: String, ids: Vec<String> },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl LeaveError {
    /// Business-rule outcomes the caller can act on, as opposed to malformed
    /// requests or store failures.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::InvalidParams(_) | Self::StoreUnavailable(_))
    }
}

impl From<LeaveError> for ErrorData {
    fn from(err: LeaveError) -> Self {
        let message = err.to_string();
        match err {
            LeaveError::InvalidParams(_) | LeaveError::MissingCriteria => {
                Self::new(ErrorCode::INVALID_PARAMS, message, None)
            }
            LeaveError::NotFound(_) | LeaveError::NameNotFound(_) => {
                Self::new(ErrorCode::RESOURCE_NOT_FOUND, message, None)
            }
            LeaveError::NameMismatch(_)
            | LeaveError::InsufficientBalance { .. }
            | LeaveError::AlreadyExists(_)
            | LeaveError::AmbiguousName { .. } => Self::new(ErrorCode::INVALID_REQUEST, message, None),
            LeaveError::StoreUnavailable(_) => Self::new(ErrorCode::INTERNAL_ERROR, message, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_name_lists_every_id() {
        let err = LeaveError::AmbiguousName {
            name: "Sam".to_string(),
            ids: vec!["E004".to_string(), "E005".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Multiple employees found with the name 'Sam'. Please specify the employee ID. IDs: E004, E005"
        );
    }

    #[test]
    fn store_failures_are_not_rejections() {
        assert!(LeaveError::NotFound("E001".to_string()).is_rejection());
        assert!(LeaveError::MissingCriteria.is_rejection());
        assert!(!LeaveError::InvalidParams("empty".to_string()).is_rejection());
        assert!(!LeaveError::StoreUnavailable(sqlx::Error::PoolClosed).is_rejection());
    }

    #[test]
    fn converts_to_protocol_error_codes() {
        let data = ErrorData::from(LeaveError::StoreUnavailable(sqlx::Error::PoolClosed));
        assert_eq!(data.code, ErrorCode::INTERNAL_ERROR);

        let data = ErrorData::from(LeaveError::InsufficientBalance { requested: 24, available: 23 });
        assert_eq!(data.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(
            data.message,
            "Insufficient leave balance. You requested 24 day(s) but have only 23."
        );
    }
}
