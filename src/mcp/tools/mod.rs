//! MCP tools for the leave ledger.
//!
//! Each module implements the tools for one area:
//! - `balance`: Check remaining leave days
//! - `apply_leave`: Apply leave for specific dates
//! - `history`: Look up leave history by id, name, or both
//! - `employee`: Add, delete and count employees
//! - `reason`: Record why leave was taken
//!
//! All tools share the same rendering: successes and business-rule
//! rejections come back as text tool results, while invalid input and store
//! failures become MCP errors.

pub mod apply_leave;
pub mod balance;
pub mod employee;
pub mod history;
pub mod reason;

use rmcp::{
    ErrorData,
    model::{CallToolResult, Content, ErrorCode},
};
use tracing::warn;

use crate::mcp::error::LeaveError;

/// Turns a ledger outcome into a tool result.
pub(crate) fn render(outcome: Result<String, LeaveError>) -> Result<CallToolResult, ErrorData> {
    match outcome {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(err) if err.is_rejection() => {
            warn!(%err, "Request rejected");
            Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
        }
        Err(err) => Err(err.into()),
    }
}

/// Rejects empty required string parameters.
pub(crate) fn require(value: &str, field: &str) -> Result<(), ErrorData> {
    if value.trim().is_empty() {
        return Err(ErrorData::new(
            ErrorCode::INVALID_PARAMS,
            format!("{field} cannot be empty."),
            None,
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::{CallToolResult, RawContent};

    /// Text of the first content block and whether the result is an error.
    pub fn text_of(result: &CallToolResult) -> (&str, bool) {
        let text = match &result.content[0].raw {
            RawContent::Text(text) => text.text.as_str(),
            _ => panic!("Expected text content"),
        };
        (text, result.is_error.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_render_as_error_results() {
        let result = render(Err(LeaveError::NotFound("E404".to_string()))).unwrap();
        let (text, is_error) = test_support::text_of(&result);
        assert!(is_error);
        assert_eq!(text, "Employee ID E404 not found.");
    }

    #[test]
    fn store_failures_become_protocol_errors() {
        let err = render(Err(LeaveError::StoreUnavailable(sqlx::Error::PoolClosed))).unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(require("E001", "Employee ID").is_ok());
        let err = require("  ", "Employee ID").unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Employee ID cannot be empty.");
    }
}
