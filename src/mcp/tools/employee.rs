//! Tools for managing employee records: add, delete and count.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcp::{
    ledger::Ledger,
    tools::{render, require},
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct AddEmployeeRequest {
    #[schemars(description = "Unique employee ID for the new record, e.g. E003")]
    pub employee_id: String,
    #[schemars(description = "Employee name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Initial leave balance in days. Defaults to 20.")]
    pub initial_balance: Option<u32>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DeleteEmployeeRequest {
    #[schemars(description = "Unique employee ID, e.g. E001")]
    pub employee_id: String,
    #[schemars(description = "Employee name, must match the name on record exactly")]
    pub name: String,
}

pub async fn add_employee(
    ledger: &Ledger,
    Parameters(args): Parameters<AddEmployeeRequest>,
) -> Result<CallToolResult, ErrorData> {
    require(&args.employee_id, "Employee ID")?;
    require(&args.name, "Name")?;
    info!(employee_id = %args.employee_id, "add_employee");

    render(
        ledger
            .add_employee(&args.employee_id, &args.name, args.initial_balance)
            .await,
    )
}

pub async fn delete_employee(
    ledger: &Ledger,
    Parameters(args): Parameters<DeleteEmployeeRequest>,
) -> Result<CallToolResult, ErrorData> {
    require(&args.employee_id, "Employee ID")?;
    require(&args.name, "Name")?;
    info!(employee_id = %args.employee_id, "delete_employee");

    render(ledger.delete_employee(&args.employee_id, &args.name).await)
}

pub async fn count_employees(ledger: &Ledger) -> Result<CallToolResult, ErrorData> {
    render(ledger.count_employees().await)
}
