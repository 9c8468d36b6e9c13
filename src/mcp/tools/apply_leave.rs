//! Tool for applying leave on specific dates.
//!
//! One day of balance is consumed per listed date. Dates are kept exactly
//! as given (duplicates included) and appended to the employee's history.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcp::{
    ledger::Ledger,
    tools::{render, require},
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ApplyLeaveRequest {
    #[schemars(description = "Unique employee ID, e.g. E001")]
    pub employee_id: String,
    #[schemars(description = "Employee name, must match the name on record exactly")]
    pub name: String,
    #[schemars(
        description = "Leave dates in YYYY-MM-DD format, e.g. [\"2025-04-17\", \"2025-05-01\"]. Each entry consumes one day."
    )]
    pub leave_dates: Vec<String>,
}

pub async fn apply_leave(
    ledger: &Ledger,
    Parameters(args): Parameters<ApplyLeaveRequest>,
) -> Result<CallToolResult, ErrorData> {
    require(&args.employee_id, "Employee ID")?;
    require(&args.name, "Name")?;
    info!(employee_id = %args.employee_id, days = args.leave_dates.len(), "apply_leave");

    render(
        ledger
            .apply_leave(&args.employee_id, &args.name, &args.leave_dates)
            .await,
    )
}
