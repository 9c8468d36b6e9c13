//! Tool for checking an employee's remaining leave days.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcp::{
    ledger::Ledger,
    tools::{render, require},
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct EmployeeIdRequest {
    #[schemars(description = "Unique employee ID, e.g. E001")]
    pub employee_id: String,
}

pub async fn get_leave_balance(
    ledger: &Ledger,
    Parameters(args): Parameters<EmployeeIdRequest>,
) -> Result<CallToolResult, ErrorData> {
    require(&args.employee_id, "Employee ID")?;
    info!(employee_id = %args.employee_id, "get_leave_balance");

    render(ledger.get_balance(&args.employee_id).await)
}
