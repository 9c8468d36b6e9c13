//! Tool for looking up an employee's leave history.
//!
//! The employee can be identified by ID, by name, or both. A name-only
//! lookup is case-insensitive and never picks between several employees
//! sharing a name; it lists their IDs instead.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcp::{
    ledger::{HistoryQuery, Ledger},
    tools::render,
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct LeaveHistoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Unique employee ID, e.g. E001")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Employee name. Matched case-insensitively when no employee ID is given, otherwise verified exactly."
    )]
    pub name: Option<String>,
}

pub async fn get_leave_history(
    ledger: &Ledger,
    Parameters(args): Parameters<LeaveHistoryRequest>,
) -> Result<CallToolResult, ErrorData> {
    info!(employee_id = ?args.employee_id, name = ?args.name, "get_leave_history");

    let query = match HistoryQuery::from_parts(args.employee_id, args.name) {
        Ok(query) => query,
        Err(err) => return render(Err(err)),
    };
    render(ledger.get_history(&query).await)
}
