//! Leave manager Model Context Protocol implementation.
//!
//! The implementation is organized into:
//!
//! - `error`: Error types and conversions
//! - `store`: SQLite persistence for employee records
//! - `ledger`: Balance, history and reason bookkeeping rules
//! - `tools`: Individual MCP tools for each ledger operation
//! - `greeting`: The `greeting://{name}` resource
//!
//! The main entry point is the `LeaveManagerMCPFactory` which provides the MCP server
//! implementation and manages all tools.

pub mod error;
pub mod greeting;
pub mod ledger;
pub mod store;
pub mod tools;

use axum::http::request;
use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Implementation, InitializeRequestParam, InitializeResult,
        ListResourceTemplatesResult, PaginatedRequestParam,
        ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::mcp::{
    ledger::Ledger,
    tools::{
        apply_leave::{self, ApplyLeaveRequest},
        balance::{self, EmployeeIdRequest},
        employee::{self, AddEmployeeRequest, DeleteEmployeeRequest},
        history::{self, LeaveHistoryRequest},
        reason::{self, LeaveReasonRequest},
    },
};

#[derive(Clone)]
pub struct LeaveManagerMCPFactory {
    ledger: Ledger,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LeaveManagerMCPFactory {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger, tool_router: Self::tool_router() }
    }

    // Thin delegating methods so the `tool_router` proc-macro can discover and
    // register the tools. The implementations live in `mcp::tools::*`.

    #[tool(description = "Check how many leave days are left for the employee")]
    async fn get_leave_balance(
        &self,
        params: Parameters<EmployeeIdRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        balance::get_leave_balance(&self.ledger, params).await
    }

    #[tool(
        description = "Apply leave for specific dates (e.g., [\"2025-04-17\", \"2025-05-01\"]). The employee name must match the record. Each date consumes one day of balance; the request is rejected in full if the balance is insufficient."
    )]
    async fn apply_leave(
        &self,
        params: Parameters<ApplyLeaveRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        apply_leave::apply_leave(&self.ledger, params).await
    }

    #[tool(
        description = "Get leave history for the employee by ID or name (at least one required). If several employees share the name, their IDs are listed instead."
    )]
    async fn get_leave_history(
        &self,
        params: Parameters<LeaveHistoryRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        history::get_leave_history(&self.ledger, params).await
    }

    #[tool(
        description = "Add a new employee with a name and an optional initial leave balance (default 20)"
    )]
    async fn add_employee(
        &self,
        params: Parameters<AddEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        employee::add_employee(&self.ledger, params).await
    }

    #[tool(description = "Return the total number of employees in the system.")]
    async fn count_employees(&self) -> Result<CallToolResult, ErrorData> {
        employee::count_employees(&self.ledger).await
    }

    #[tool(
        description = "Record the reason for leave on specific dates. Does not change the leave balance."
    )]
    async fn add_leave_reason(
        &self,
        params: Parameters<LeaveReasonRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        reason::add_leave_reason(&self.ledger, params).await
    }

    #[tool(
        description = "Permanently delete an employee and all their leave records. The employee name must match the record."
    )]
    async fn delete_employee(
        &self,
        params: Parameters<DeleteEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        employee::delete_employee(&self.ledger, params).await
    }
}

#[tool_handler]
impl ServerHandler for LeaveManagerMCPFactory {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Leave manager MCP Server: check balances, apply leave, view history and manage employees"
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        if let Some(http_request_part) = context.extensions.get::<request::Parts>() {
            let initialize_headers = &http_request_part.headers;
            let initialize_uri = &http_request_part.uri;
            info!(?initialize_headers, %initialize_uri, "initialize from http server");
        }
        Ok(self.get_info())
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![greeting::greeting_template()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        info!(uri = %request.uri, "read_resource");
        greeting::read_greeting(&request.uri).ok_or_else(|| {
            ErrorData::resource_not_found(format!("Unknown resource: {}", request.uri), None)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::{store::EmployeeStore, tools::test_support::text_of};
    use rmcp::model::ErrorCode;

    async fn factory() -> LeaveManagerMCPFactory {
        let store = EmployeeStore::in_memory().await.unwrap();
        store.insert("E001", "Shreyas", 25).await.unwrap();
        LeaveManagerMCPFactory::new(Ledger::new(store))
    }

    #[tokio::test]
    async fn registers_every_ledger_tool() {
        let factory = factory().await;
        let mut names: Vec<_> = factory
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "add_employee",
                "add_leave_reason",
                "apply_leave",
                "count_employees",
                "delete_employee",
                "get_leave_balance",
                "get_leave_history",
            ]
        );
    }

    #[tokio::test]
    async fn apply_then_check_balance_and_history() {
        let factory = factory().await;

        let applied = factory
            .apply_leave(Parameters(ApplyLeaveRequest {
                employee_id: "E001".to_string(),
                name: "Shreyas".to_string(),
                leave_dates: vec!["2025-04-17".to_string(), "2025-05-01".to_string()],
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&applied),
            ("Leave applied for 2 day(s) for Shreyas (E001). Remaining balance: 23.", false)
        );

        let balance = factory
            .get_leave_balance(Parameters(EmployeeIdRequest { employee_id: "E001".to_string() }))
            .await
            .unwrap();
        assert_eq!(text_of(&balance), ("Shreyas (E001) has 23 leave days remaining.", false));

        let history = factory
            .get_leave_history(Parameters(LeaveHistoryRequest {
                employee_id: None,
                name: Some("SHREYAS".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&history),
            ("Leave history for Shreyas (E001): 2025-04-17, 2025-05-01", false)
        );
    }

    #[tokio::test]
    async fn business_rejections_are_error_results() {
        let factory = factory().await;

        let missing = factory
            .get_leave_history(Parameters(LeaveHistoryRequest { employee_id: None, name: None }))
            .await
            .unwrap();
        assert_eq!(text_of(&missing), ("Please provide either employee ID or name.", true));

        let duplicate = factory
            .add_employee(Parameters(AddEmployeeRequest {
                employee_id: "E001".to_string(),
                name: "Shreyas".to_string(),
                initial_balance: None,
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&duplicate), ("Employee E001 already exists.", true));

        let mismatch = factory
            .delete_employee(Parameters(DeleteEmployeeRequest {
                employee_id: "E001".to_string(),
                name: "Sharath".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&mismatch), ("Name does not match for employee ID E001.", true));
    }

    #[tokio::test]
    async fn empty_parameters_are_protocol_errors() {
        let factory = factory().await;

        let err = factory
            .get_leave_balance(Parameters(EmployeeIdRequest { employee_id: String::new() }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = factory
            .apply_leave(Parameters(ApplyLeaveRequest {
                employee_id: "E001".to_string(),
                name: "Shreyas".to_string(),
                leave_dates: Vec::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn leave_reason_rejects_empty_dates_and_unknown_ids() {
        let store = EmployeeStore::in_memory().await.unwrap();
        store.insert("E001", "Shreyas", 25).await.unwrap();
        let factory = LeaveManagerMCPFactory::new(Ledger::new(store.clone()));

        let err = factory
            .add_leave_reason(Parameters(LeaveReasonRequest {
                employee_id: "E001".to_string(),
                name: "Shreyas".to_string(),
                leave_dates: Vec::new(),
                reason: "Family trip".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let unknown = factory
            .add_leave_reason(Parameters(LeaveReasonRequest {
                employee_id: "E404".to_string(),
                name: "Shreyas".to_string(),
                leave_dates: vec!["2025-09-01".to_string()],
                reason: "Family trip".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&unknown), ("Employee ID E404 not found.", true));

        let employee = store.find_one("E001").await.unwrap().unwrap();
        assert!(employee.leaves_reason.is_empty());
        assert_eq!(employee.balance, 25);
    }

    #[tokio::test]
    async fn add_reason_count_and_delete() {
        let factory = factory().await;

        let added = factory
            .add_employee(Parameters(AddEmployeeRequest {
                employee_id: "E003".to_string(),
                name: "Alex".to_string(),
                initial_balance: None,
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&added), ("Employee Alex (E003) added with 20 leave days.", false));

        let reason = factory
            .add_leave_reason(Parameters(LeaveReasonRequest {
                employee_id: "E003".to_string(),
                name: "Alex".to_string(),
                leave_dates: vec!["2025-09-01".to_string()],
                reason: "Moving house".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&reason),
            ("Recorded reason for 1 day(s) for Alex (E003): Moving house", false)
        );

        let count = factory.count_employees().await.unwrap();
        assert_eq!(text_of(&count), ("There are 2 employees in the system.", false));

        let deleted = factory
            .delete_employee(Parameters(DeleteEmployeeRequest {
                employee_id: "E003".to_string(),
                name: "Alex".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&deleted), ("Employee Alex (E003) has been deleted.", false));

        let count = factory.count_employees().await.unwrap();
        assert_eq!(text_of(&count), ("There are 1 employees in the system.", false));
    }

    #[tokio::test]
    async fn advertises_tools_and_resources() {
        let info = factory().await.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }
}
