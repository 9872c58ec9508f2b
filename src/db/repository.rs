//! Persistence contract shared by every store backend.

use crate::db::context::QueryContext;
use crate::errors::StoreResult;
use crate::models::{Entry, LabScore, ScoreOverride, StatResult};
use crate::utils::time::TimestampFormat;
use std::path::Path;

/// Read/write contract for entries, lab scores and overrides.
///
/// Arguments identifying a row are always ordered (course, lab, student).
/// Absent rows are `Ok(None)`; only backend failures are errors.
pub trait ScoreStore: Send + Sync {
    /// Idempotent schema setup; extra `*.sql` files from `dir` run once each.
    fn apply_migrations(&self, dir: Option<&Path>) -> StoreResult<()>;

    /// The event type `get_student_finish_event` looks for.
    fn finish_event_type(&self) -> &str;

    fn create_entry(&self, ctx: &QueryContext, entry: &Entry) -> StoreResult<()>;

    /// Earliest finish-type entry for the triple.
    fn get_student_finish_event(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<Entry>>;

    /// All entries of a course ordered by (student, lab, timestamp).
    fn list_entries(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<Entry>>;

    fn get_score_override(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<ScoreOverride>>;

    /// Insert or replace by (course, lab, student).
    fn create_score_override(&self, ctx: &QueryContext, ov: &ScoreOverride) -> StoreResult<()>;

    /// Ordered by (lab, student).
    fn list_course_score_overrides(
        &self,
        ctx: &QueryContext,
        course: &str,
    ) -> StoreResult<Vec<ScoreOverride>>;

    /// Insert or replace by (course, lab).
    fn create_lab_score(&self, ctx: &QueryContext, lab_score: &LabScore) -> StoreResult<()>;

    fn get_lab_score(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
    ) -> StoreResult<Option<LabScore>>;

    /// Ordered by lab code ascending.
    fn list_lab_scores(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<LabScore>>;

    /// Ordered by (student, lab, timestamp).
    fn get_course_events_by_type(
        &self,
        ctx: &QueryContext,
        course: &str,
        event_type: &str,
    ) -> StoreResult<Vec<Entry>>;

    /// One row per (student, lab, course) with at least one start event,
    /// ordered by (student, lab).
    fn get_detailed_stats(
        &self,
        ctx: &QueryContext,
        course: &str,
        start_event_type: &str,
        finish_event_type: &str,
        timestamp_format: &TimestampFormat,
        include_human: bool,
    ) -> StoreResult<Vec<StatResult>>;
}

/// Fill the human-readable columns of freshly aggregated rows.
pub(crate) fn render_human(rows: &mut [StatResult], format: &TimestampFormat) {
    for row in rows {
        row.human_first_run = format.render(row.first_run);
        row.human_first_finish = row.first_finish.and_then(|ts| format.render(ts));
    }
}
