//! SQL bodies and row mappers behind `SqliteStore`.

use crate::db::context::QueryContext;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::SqliteStore;
use crate::db::repository::{ScoreStore, render_human};
use crate::errors::StoreResult;
use crate::models::{Entry, LabScore, ScoreOverride, StatResult};
use crate::utils::time::TimestampFormat;
use rusqlite::{OptionalExtension, Row, params};
use std::path::Path;

const ENTRY_COLUMNS: &str = "timestamp, event_type, lab, student, course, comment";

const DETAILED_STATS_SQL: &str = r#"
    WITH start_events AS (
        SELECT
            student,
            lab,
            course,
            COUNT(*) AS start_count,
            MIN(timestamp) AS first_run
        FROM entries
        WHERE course = ?1
          AND event_type = ?2
        GROUP BY student, lab, course
    ),
    finish_events AS (
        SELECT
            student,
            lab,
            course,
            MIN(timestamp) AS first_finish
        FROM entries
        WHERE course = ?1
          AND event_type = ?3
        GROUP BY student, lab, course
    )
    SELECT
        se.student,
        se.lab,
        se.course,
        se.start_count,
        se.first_run,
        fe.first_finish,
        CASE
            WHEN fe.first_finish IS NOT NULL
            THEN fe.first_finish - se.first_run
        END AS delta_seconds
    FROM start_events se
    LEFT JOIN finish_events fe
        ON se.student = fe.student
       AND se.lab = fe.lab
       AND se.course = fe.course
    ORDER BY se.student, se.lab
"#;

fn map_entry(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        timestamp: row.get("timestamp")?,
        event_type: row.get("event_type")?,
        lab: row.get("lab")?,
        student: row.get("student")?,
        course: row.get("course")?,
        comment: row.get("comment")?,
    })
}

fn map_lab_score(row: &Row) -> rusqlite::Result<LabScore> {
    Ok(LabScore {
        course: row.get("course")?,
        lab: row.get("lab")?,
        base_score: row.get("base_score")?,
        deadline: row.get("deadline")?,
    })
}

fn map_override(row: &Row) -> rusqlite::Result<ScoreOverride> {
    Ok(ScoreOverride {
        course: row.get("course")?,
        lab: row.get("lab")?,
        student: row.get("student")?,
        score: row.get("score")?,
        reason: row.get("reason")?,
    })
}

fn map_stat(row: &Row) -> rusqlite::Result<StatResult> {
    Ok(StatResult {
        student: row.get("student")?,
        lab: row.get("lab")?,
        course: row.get("course")?,
        start_count: row.get("start_count")?,
        first_run: row.get("first_run")?,
        first_finish: row.get("first_finish")?,
        delta_seconds: row.get("delta_seconds")?,
        human_first_run: None,
        human_first_finish: None,
    })
}

impl ScoreStore for SqliteStore {
    fn apply_migrations(&self, dir: Option<&Path>) -> StoreResult<()> {
        let mut conn = self.lock_for_migrations()?;
        let applied = run_pending_migrations(&mut *conn, dir)?;
        if applied > 0 {
            tracing::info!(applied, db = self.path(), "database schema updated");
        }
        Ok(())
    }

    fn finish_event_type(&self) -> &str {
        self.finish_event()
    }

    fn create_entry(&self, ctx: &QueryContext, entry: &Entry) -> StoreResult<()> {
        self.with_conn(ctx, "create entry", |conn| {
            conn.execute(
                "INSERT INTO entries (timestamp, event_type, lab, student, course, comment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.timestamp,
                    entry.event_type,
                    entry.lab,
                    entry.student,
                    entry.course,
                    entry.comment,
                ],
            )?;
            Ok(())
        })
    }

    fn get_student_finish_event(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<Entry>> {
        let finish = self.finish_event();
        self.with_conn(ctx, "get finish event", |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE course = ?1
                   AND lab = ?2
                   AND student = ?3
                   AND event_type = ?4
                 ORDER BY timestamp ASC, id ASC
                 LIMIT 1"
            ))?;
            stmt.query_row(params![course, lab, student, finish], map_entry)
                .optional()
        })
    }

    fn list_entries(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<Entry>> {
        self.with_conn(ctx, "list entries", |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE course = ?1
                 ORDER BY student, lab, timestamp ASC, id ASC"
            ))?;
            let rows = stmt.query_map([course], map_entry)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    fn get_score_override(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<ScoreOverride>> {
        self.with_conn(ctx, "get score override", |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT course, lab, student, score, reason
                 FROM score_overrides
                 WHERE course = ?1
                   AND lab = ?2
                   AND student = ?3",
            )?;
            stmt.query_row(params![course, lab, student], map_override)
                .optional()
        })
    }

    fn create_score_override(&self, ctx: &QueryContext, ov: &ScoreOverride) -> StoreResult<()> {
        self.with_conn(ctx, "create score override", |conn| {
            conn.execute(
                "INSERT INTO score_overrides (course, lab, student, score, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(course, lab, student) DO UPDATE SET
                     score = excluded.score,
                     reason = excluded.reason",
                params![ov.course, ov.lab, ov.student, ov.score, ov.reason],
            )?;
            Ok(())
        })
    }

    fn list_course_score_overrides(
        &self,
        ctx: &QueryContext,
        course: &str,
    ) -> StoreResult<Vec<ScoreOverride>> {
        self.with_conn(ctx, "list score overrides", |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT course, lab, student, score, reason
                 FROM score_overrides
                 WHERE course = ?1
                 ORDER BY lab, student",
            )?;
            let rows = stmt.query_map([course], map_override)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    fn create_lab_score(&self, ctx: &QueryContext, lab_score: &LabScore) -> StoreResult<()> {
        self.with_conn(ctx, "register lab score", |conn| {
            conn.execute(
                "INSERT INTO lab_scores (course, lab, base_score, deadline)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(course, lab) DO UPDATE SET
                     base_score = excluded.base_score,
                     deadline = excluded.deadline",
                params![
                    lab_score.course,
                    lab_score.lab,
                    lab_score.base_score,
                    lab_score.deadline,
                ],
            )?;
            Ok(())
        })
    }

    fn get_lab_score(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
    ) -> StoreResult<Option<LabScore>> {
        self.with_conn(ctx, "get lab score", |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT course, lab, base_score, deadline
                 FROM lab_scores
                 WHERE course = ?1 AND lab = ?2",
            )?;
            stmt.query_row(params![course, lab], map_lab_score).optional()
        })
    }

    fn list_lab_scores(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<LabScore>> {
        self.with_conn(ctx, "list lab scores", |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT course, lab, base_score, deadline
                 FROM lab_scores
                 WHERE course = ?1
                 ORDER BY lab ASC",
            )?;
            let rows = stmt.query_map([course], map_lab_score)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    fn get_course_events_by_type(
        &self,
        ctx: &QueryContext,
        course: &str,
        event_type: &str,
    ) -> StoreResult<Vec<Entry>> {
        self.with_conn(ctx, "get course events", |conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE course = ?1 AND event_type = ?2
                 ORDER BY student, lab, timestamp ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![course, event_type], map_entry)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    fn get_detailed_stats(
        &self,
        ctx: &QueryContext,
        course: &str,
        start_event_type: &str,
        finish_event_type: &str,
        timestamp_format: &TimestampFormat,
        include_human: bool,
    ) -> StoreResult<Vec<StatResult>> {
        let mut rows = self.with_conn(ctx, "fetch stats", |conn| {
            let mut stmt = conn.prepare_cached(DETAILED_STATS_SQL)?;
            let rows = stmt.query_map(
                params![course, start_event_type, finish_event_type],
                map_stat,
            )?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })?;

        if include_human {
            render_human(&mut rows, timestamp_format);
        }
        Ok(rows)
    }
}
