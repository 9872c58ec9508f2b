//! SQLite-backed store: one connection shared behind a mutex.

use crate::db::context::QueryContext;
use crate::db::log;
use crate::errors::{StoreError, StoreResult};
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Virtual-machine steps between two cancellation checks.
const PROGRESS_STEPS: i32 = 1_000;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    finish_event: String,
    path: String,
}

impl SqliteStore {
    pub fn open(path: &str, finish_event: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open(Path::new(path)).map_err(|e| StoreError::Query {
            op: "open database",
            source: e,
        })?;
        Self::from_connection(conn, finish_event, path)
    }

    pub fn open_in_memory(finish_event: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Query {
            op: "open database",
            source: e,
        })?;
        Self::from_connection(conn, finish_event, ":memory:")
    }

    fn from_connection(
        conn: Connection,
        finish_event: impl Into<String>,
        path: &str,
    ) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Query {
                op: "enable foreign keys",
                source: e,
            })?;

        Ok(Self {
            conn: Mutex::new(conn),
            finish_event: finish_event.into(),
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bound how long a statement waits on a database locked by another process.
    pub fn set_busy_timeout(&self, timeout: Duration) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.busy_timeout(timeout).map_err(|e| StoreError::Query {
            op: "set busy timeout",
            source: e,
        })
    }

    /// Helper to execute a closure with the connection under `ctx`.
    ///
    /// Waiting for the connection counts against `ctx`, and a progress
    /// handler interrupts the running statement once it is done.
    pub fn with_conn<F, T>(&self, ctx: &QueryContext, op: &'static str, func: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T>,
    {
        let mut conn = ctx.acquire(|| self.conn.try_lock())?;

        conn.progress_handler(PROGRESS_STEPS, Some(ctx.probe()))
            .map_err(|e| StoreError::Query { op, source: e })?;
        let result = func(&mut *conn);
        if let Err(e) = conn.progress_handler(PROGRESS_STEPS, None::<fn() -> bool>) {
            // a stale probe only interrupts later statements once its own context is done
            tracing::warn!(op, error = %e, "failed to clear progress handler");
        }

        result.map_err(|e| {
            if e.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
                tracing::debug!(op, "statement interrupted by query context");
                StoreError::Cancelled
            } else {
                StoreError::Query { op, source: e }
            }
        })
    }

    /// Append an audit line for an administrative action.
    pub fn audit(&self, operation: &str, target: &str, message: &str) -> StoreResult<()> {
        self.with_conn(&QueryContext::background(), "write audit log", |conn| {
            log::audit(conn, operation, target, message)
        })
    }

    pub(crate) fn finish_event(&self) -> &str {
        &self.finish_event
    }

    pub(crate) fn lock_for_migrations(
        &self,
    ) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}
