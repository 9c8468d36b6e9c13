//! SQLite-backed record store for employee leave data.
//!
//! This module provides:
//! - Environment-based configuration of the store endpoint (`DATABASE_URL`)
//! - Pool construction and idempotent schema creation
//! - The record primitives used by the leave ledger (lookup, name search,
//!   insert, delete, guarded balance update, reason append, count)
//!
//! Every multi-row mutation runs inside a single transaction, so a failure
//! part way through rolls back when the transaction is dropped.

use std::{env, str::FromStr, sync::LazyLock, time::Duration};

use serde::{Deserialize, Serialize};
use sqlx::{
    FromRow, SqliteConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, info};

// Load configuration from environment variables
pub static DATABASE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://leave_manager.db".to_string())
});

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS employees (
        employee_id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        balance INTEGER NOT NULL CHECK (balance >= 0)
    )",
    "CREATE TABLE IF NOT EXISTS leave_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL REFERENCES employees (employee_id) ON DELETE CASCADE,
        leave_date TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS leave_reasons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL REFERENCES employees (employee_id) ON DELETE CASCADE,
        dates TEXT NOT NULL,
        reason TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS leave_history_employee ON leave_history (employee_id)",
];

/// A free-text reason attached to a set of leave dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveReason {
    pub dates: Vec<String>,
    pub reason: String,
}

/// One employee record with its full history and reason log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub balance: i64,
    pub history: Vec<String>,
    pub leaves_reason: Vec<LeaveReason>,
}

#[derive(FromRow)]
struct EmployeeRow {
    employee_id: String,
    name: String,
    balance: i64,
}

/// Handle to the employee collection.
///
/// Cloning is cheap: clones share the same connection pool. The handle is
/// opened once at startup and closed with [`EmployeeStore::close`] at shutdown.
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    pool: SqlitePool,
}

impl EmployeeStore {
    /// Opens (creating if missing) the database at `url` and ensures the schema exists.
    ///
    /// # Errors
    /// Returns `sqlx::Error` if the URL is malformed, the database cannot be
    /// opened, or the schema statements fail.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        info!(url, "Connected to employee store");
        Self::with_pool(pool).await
    }

    /// A private in-memory database. The pool pins a single connection because
    /// every SQLite `:memory:` connection is its own database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    /// Closes every pooled connection. Further calls fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Employee store closed");
    }

    /// Point lookup by employee id.
    pub async fn find_one(&self, employee_id: &str) -> Result<Option<Employee>, sqlx::Error> {
        debug!(employee_id, "find_one");
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT employee_id, name, balance FROM employees WHERE employee_id = ?",
        )
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?;

        let employee = match row {
            Some(row) => Some(hydrate(&mut tx, row).await?),
            None => None,
        };
        tx.commit().await?;
        Ok(employee)
    }

    /// All records whose name equals `name` ignoring case, ordered by id.
    ///
    /// Matching is whole-name equality on the Unicode lowercase forms, never a
    /// substring match.
    pub async fn find_matching(&self, name: &str) -> Result<Vec<Employee>, sqlx::Error> {
        debug!(name, "find_matching");
        let needle = name.to_lowercase();
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT employee_id, name, balance FROM employees ORDER BY employee_id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut matches = Vec::new();
        for row in rows.into_iter().filter(|row| row.name.to_lowercase() == needle) {
            matches.push(hydrate(&mut tx, row).await?);
        }
        tx.commit().await?;
        Ok(matches)
    }

    /// Inserts a new record with empty history. Returns `false` when the id is
    /// already taken; the uniqueness check and the insert are one statement.
    pub async fn insert(
        &self,
        employee_id: &str,
        name: &str,
        balance: i64,
    ) -> Result<bool, sqlx::Error> {
        debug!(employee_id, name, balance, "insert");
        let result = sqlx::query(
            "INSERT INTO employees (employee_id, name, balance) VALUES (?, ?, ?)
             ON CONFLICT (employee_id) DO NOTHING",
        )
        .bind(employee_id)
        .bind(name)
        .bind(balance)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes the record together with its history and reasons.
    pub async fn delete(&self, employee_id: &str) -> Result<bool, sqlx::Error> {
        debug!(employee_id, "delete");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM leave_history WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM leave_reasons WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() == 1)
    }

    /// Adds `delta` to the balance and appends `dates` to the history in one
    /// transaction.
    ///
    /// The update only applies to the record that still carries `name`, and is
    /// guarded so the balance can never drop below zero. Returns the new
    /// balance, or `None` (with nothing written) when the record is missing,
    /// the name differs, or the guard rejects the change.
    pub async fn increment_and_append(
        &self,
        employee_id: &str,
        name: &str,
        delta: i64,
        dates: &[String],
    ) -> Result<Option<i64>, sqlx::Error> {
        debug!(employee_id, delta, days = dates.len(), "increment_and_append");
        let mut tx = self.pool.begin().await?;

        let balance: Option<i64> = sqlx::query_scalar(
            "UPDATE employees SET balance = balance + ?1
             WHERE employee_id = ?2 AND name = ?3 AND balance + ?1 >= 0
             RETURNING balance",
        )
        .bind(delta)
        .bind(employee_id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(balance) = balance else {
            return Ok(None);
        };

        for date in dates {
            sqlx::query("INSERT INTO leave_history (employee_id, leave_date) VALUES (?, ?)")
                .bind(employee_id)
                .bind(date)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(balance))
    }

    /// Appends one entry to the record's reason log. Returns `false` when the
    /// record does not exist.
    pub async fn append_reason(
        &self,
        employee_id: &str,
        entry: &LeaveReason,
    ) -> Result<bool, sqlx::Error> {
        debug!(employee_id, days = entry.dates.len(), "append_reason");
        let dates =
            serde_json::to_string(&entry.dates).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let result = sqlx::query(
            "INSERT INTO leave_reasons (employee_id, dates, reason)
             SELECT ?1, ?2, ?3 WHERE EXISTS (SELECT 1 FROM employees WHERE employee_id = ?1)",
        )
        .bind(employee_id)
        .bind(dates)
        .bind(&entry.reason)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Exact number of employee records.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
    }
}

async fn hydrate(conn: &mut SqliteConnection, row: EmployeeRow) -> Result<Employee, sqlx::Error> {
    let history: Vec<String> =
        sqlx::query_scalar("SELECT leave_date FROM leave_history WHERE employee_id = ? ORDER BY id")
            .bind(&row.employee_id)
            .fetch_all(&mut *conn)
            .await?;

    let reasons: Vec<(String, String)> =
        sqlx::query_as("SELECT dates, reason FROM leave_reasons WHERE employee_id = ? ORDER BY id")
            .bind(&row.employee_id)
            .fetch_all(&mut *conn)
            .await?;

    let leaves_reason = reasons
        .into_iter()
        .map(|(dates, reason)| {
            let dates = serde_json::from_str(&dates).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            Ok(LeaveReason { dates, reason })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    Ok(Employee {
        employee_id: row.employee_id,
        name: row.name,
        balance: row.balance,
        history,
        leaves_reason,
    })
}
