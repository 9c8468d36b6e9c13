//! Leave ledger: the bookkeeping rules for balances, history and reasons.
//!
//! Every operation is a single lookup-or-mutate against one employee record.
//! Checks run in a fixed order (existence, then name, then balance) and a
//! rejected call never writes anything.

use tracing::{info, instrument, warn};

use crate::mcp::{
    error::LeaveError,
    store::{Employee, EmployeeStore, LeaveReason},
};

/// Leave days granted when `add_employee` is called without a balance.
pub const DEFAULT_INITIAL_BALANCE: u32 = 20;

/// How a history lookup identifies the employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryQuery {
    ById(String),
    ByName(String),
    Both { employee_id: String, name: String },
}

impl HistoryQuery {
    /// Builds a query from two optional inputs. Blank strings count as absent.
    ///
    /// # Errors
    /// `LeaveError::MissingCriteria` when neither input is present.
    pub fn from_parts(employee_id: Option<String>, name: Option<String>) -> Result<Self, LeaveError> {
        let employee_id = employee_id.filter(|id| !id.trim().is_empty());
        let name = name.filter(|name| !name.trim().is_empty());

        match (employee_id, name) {
            (Some(employee_id), Some(name)) => Ok(Self::Both { employee_id, name }),
            (Some(employee_id), None) => Ok(Self::ById(employee_id)),
            (None, Some(name)) => Ok(Self::ByName(name)),
            (None, None) => Err(LeaveError::MissingCriteria),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ledger {
    store: EmployeeStore,
}

impl Ledger {
    #[must_use]
    pub const fn new(store: EmployeeStore) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn get_balance(&self, employee_id: &str) -> Result<String, LeaveError> {
        let employee = self.lookup(employee_id).await?;
        Ok(format!(
            "{} ({}) has {} leave days remaining.",
            employee.name, employee.employee_id, employee.balance
        ))
    }

    /// Deducts one day per entry in `leave_dates` and records the dates.
    ///
    /// The deduction and the history append are a single guarded store update,
    /// so concurrent applications against the same employee cannot overdraw
    /// the balance.
    #[instrument(skip(self))]
    pub async fn apply_leave(
        &self,
        employee_id: &str,
        name: &str,
        leave_dates: &[String],
    ) -> Result<String, LeaveError> {
        if leave_dates.is_empty() {
            return Err(LeaveError::InvalidParams(
                "At least one leave date is required.".to_string(),
            ));
        }

        let employee = self.verified(employee_id, name).await?;
        let requested = i64::try_from(leave_dates.len())
            .map_err(|_| LeaveError::InvalidParams("Too many leave dates.".to_string()))?;

        if requested > employee.balance {
            warn!(requested, available = employee.balance, "Insufficient leave balance");
            return Err(LeaveError::InsufficientBalance { requested, available: employee.balance });
        }

        let Some(balance) = self
            .store
            .increment_and_append(employee_id, name, -requested, leave_dates)
            .await?
        else {
            return Err(self.rejected_update(employee_id, name, requested).await);
        };

        info!(requested, balance, "Leave applied");
        Ok(format!(
            "Leave applied for {requested} day(s) for {name} ({employee_id}). Remaining balance: {balance}."
        ))
    }

    #[instrument(skip(self))]
    pub async fn get_history(&self, query: &HistoryQuery) -> Result<String, LeaveError> {
        let employee = match query {
            HistoryQuery::ById(employee_id) => self.lookup(employee_id).await?,
            HistoryQuery::Both { employee_id, name } => self.verified(employee_id, name).await?,
            HistoryQuery::ByName(name) => {
                let mut matches = self.store.find_matching(name).await?;
                match matches.len() {
                    0 => return Err(LeaveError::NameNotFound(name.clone())),
                    1 => matches.remove(0),
                    _ => {
                        let ids = matches.into_iter().map(|e| e.employee_id).collect();
                        return Err(LeaveError::AmbiguousName { name: name.clone(), ids });
                    }
                }
            }
        };

        let history = if employee.history.is_empty() {
            "No leaves taken.".to_string()
        } else {
            employee.history.join(", ")
        };
        Ok(format!(
            "Leave history for {} ({}): {history}",
            employee.name, employee.employee_id
        ))
    }

    #[instrument(skip(self))]
    pub async fn add_employee(
        &self,
        employee_id: &str,
        name: &str,
        initial_balance: Option<u32>,
    ) -> Result<String, LeaveError> {
        let balance = initial_balance.unwrap_or(DEFAULT_INITIAL_BALANCE);

        if !self.store.insert(employee_id, name, i64::from(balance)).await? {
            warn!("Employee already exists");
            return Err(LeaveError::AlreadyExists(employee_id.to_string()));
        }

        info!(balance, "Employee added");
        Ok(format!("Employee {name} ({employee_id}) added with {balance} leave days."))
    }

    #[instrument(skip(self))]
    pub async fn count_employees(&self) -> Result<String, LeaveError> {
        let count = self.store.count().await?;
        Ok(format!("There are {count} employees in the system."))
    }

    /// Records why leave was taken. This neither checks nor changes the
    /// balance, and the dates are not cross-checked against the history.
    #[instrument(skip(self))]
    pub async fn add_leave_reason(
        &self,
        employee_id: &str,
        name: &str,
        leave_dates: Vec<String>,
        reason: String,
    ) -> Result<String, LeaveError> {
        if leave_dates.is_empty() {
            return Err(LeaveError::InvalidParams(
                "At least one leave date is required.".to_string(),
            ));
        }

        self.verified(employee_id, name).await?;

        let days = leave_dates.len();
        let entry = LeaveReason { dates: leave_dates, reason };
        if !self.store.append_reason(employee_id, &entry).await? {
            return Err(LeaveError::NotFound(employee_id.to_string()));
        }

        info!(days, "Leave reason recorded");
        Ok(format!(
            "Recorded reason for {days} day(s) for {name} ({employee_id}): {}",
            entry.reason
        ))
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, employee_id: &str, name: &str) -> Result<String, LeaveError> {
        self.verified(employee_id, name).await?;

        if !self.store.delete(employee_id).await? {
            return Err(LeaveError::NotFound(employee_id.to_string()));
        }

        info!("Employee deleted");
        Ok(format!("Employee {name} ({employee_id}) has been deleted."))
    }

    async fn lookup(&self, employee_id: &str) -> Result<Employee, LeaveError> {
        self.store
            .find_one(employee_id)
            .await?
            .ok_or_else(|| LeaveError::NotFound(employee_id.to_string()))
    }

    /// Explains why the guarded update in `apply_leave` wrote nothing: another
    /// caller deleted, replaced or drew down the record after it was verified.
    async fn rejected_update(&self, employee_id: &str, name: &str, requested: i64) -> LeaveError {
        match self.verified(employee_id, name).await {
            Ok(current) => {
                warn!(requested, available = current.balance, "Balance changed concurrently");
                LeaveError::InsufficientBalance { requested, available: current.balance }
            }
            Err(err) => err,
        }
    }

    async fn verified(&self, employee_id: &str, name: &str) -> Result<Employee, LeaveError> {
        let employee = self.lookup(employee_id).await?;
        if employee.name != name {
            warn!(employee_id, "Name does not match");
            return Err(LeaveError::NameMismatch(employee_id.to_string()));
        }
        Ok(employee)
    }
}
