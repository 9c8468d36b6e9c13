//! Tool for recording why leave was taken.
//!
//! Reasons are an append-only log per employee. Recording one does not touch
//! the balance and is not checked against previously applied dates.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcp::{
    ledger::Ledger,
    tools::{render, require},
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct LeaveReasonRequest {
    #[schemars(description = "Unique employee ID, e.g. E001")]
    pub employee_id: String,
    #[schemars(description = "Employee name, must match the name on record exactly")]
    pub name: String,
    #[schemars(description = "Leave dates the reason applies to, in YYYY-MM-DD format")]
    pub leave_dates: Vec<String>,
    #[schemars(description = "Why the leave was taken, e.g. \"Medical appointment\"")]
    pub reason: String,
}

pub async fn add_leave_reason(
    ledger: &Ledger,
    Parameters(args): Parameters<LeaveReasonRequest>,
) -> Result<CallToolResult, ErrorData> {
    require(&args.employee_id, "Employee ID")?;
    require(&args.name, "Name")?;
    require(&args.reason, "Reason")?;
    info!(employee_id = %args.employee_id, days = args.leave_dates.len(), "add_leave_reason");

    render(
        ledger
            .add_leave_reason(&args.employee_id, &args.name, args.leave_dates, args.reason)
            .await,
    )
}
