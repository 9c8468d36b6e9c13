//! Persistence layer for employee leave records.
//!
//! This module owns the connection pool and the SQL that backs the
//! leave ledger. The ledger only talks to [`EmployeeStore`].

mod sqlite;

// Re-export the store's public API
pub use sqlite::{DATABASE_URL, Employee, EmployeeStore, LeaveReason};
