//! Schema migrations.
//!
//! Applied versions are recorded in the `log` table
//! (`operation = 'migration_applied'`, `target = <version>`), so running
//! the migrator again is a no-op.

use crate::errors::{StoreError, StoreResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

/// Built-in schema, applied in order before any external migration.
const BUILTIN_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20240101_0001_create_entries",
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   INTEGER NOT NULL,
            event_type  TEXT NOT NULL,
            lab         TEXT NOT NULL,
            student     TEXT NOT NULL,
            course      TEXT NOT NULL,
            comment     TEXT,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_entries_course_type
            ON entries(course, event_type, student, lab, timestamp);
        "#,
    ),
    (
        "20240101_0002_create_lab_scores",
        r#"
        CREATE TABLE IF NOT EXISTS lab_scores (
            course      TEXT NOT NULL,
            lab         TEXT NOT NULL,
            base_score  INTEGER NOT NULL,
            deadline    INTEGER NOT NULL,
            PRIMARY KEY (course, lab)
        );
        "#,
    ),
    (
        "20240101_0003_create_score_overrides",
        r#"
        CREATE TABLE IF NOT EXISTS score_overrides (
            course   TEXT NOT NULL,
            lab      TEXT NOT NULL,
            student  TEXT NOT NULL,
            score    INTEGER NOT NULL,
            reason   TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (course, lab, student)
        );
        "#,
    ),
];

/// Ensure that the `log` table exists; it doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run one migration inside a transaction and mark it as applied.
/// Returns `false` when it had already been applied.
fn apply_one(conn: &mut Connection, version: &str, sql: &str) -> StoreResult<bool> {
    let fail = |e: rusqlite::Error| StoreError::Migration {
        name: version.to_string(),
        reason: e.to_string(),
    };

    if is_applied(conn, version).map_err(fail)? {
        return Ok(false);
    }

    let tx = conn.transaction().map_err(fail)?;
    tx.execute_batch(sql).map_err(fail)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![
            Local::now().to_rfc3339(),
            version,
            format!("Applied migration {}", version)
        ],
    )
    .map_err(fail)?;
    tx.commit().map_err(fail)?;

    tracing::debug!(version, "migration applied");
    Ok(true)
}

/// `*.sql` files of `dir`, sorted by file name.
fn collect_sql_files(dir: &Path) -> StoreResult<Vec<(String, String)>> {
    let mut files = Vec::new();

    for ent in fs::read_dir(dir)? {
        let path = ent?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let sql = fs::read_to_string(&path)?;
        files.push((stem.to_string(), sql));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Public entry point: run all pending migrations.
///
/// Returns the number of migrations applied by this call.
pub fn run_pending_migrations(conn: &mut Connection, dir: Option<&Path>) -> StoreResult<usize> {
    ensure_log_table(conn).map_err(|e| StoreError::Migration {
        name: "log".into(),
        reason: e.to_string(),
    })?;

    let mut applied = 0;

    for (version, sql) in BUILTIN_MIGRATIONS {
        if apply_one(conn, version, sql)? {
            applied += 1;
        }
    }

    if let Some(dir) = dir {
        for (version, sql) in collect_sql_files(dir)? {
            if apply_one(conn, &version, &sql)? {
                applied += 1;
            }
        }
    }

    Ok(applied)
}
