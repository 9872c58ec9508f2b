//! Per-student lab timing summaries.

use crate::db::context::QueryContext;
use crate::db::repository::ScoreStore;
use crate::errors::StoreResult;
use crate::models::StatResult;
use crate::utils::time::{TimestampFormat, format_duration};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendered timestamps, only present when human output was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanTimes {
    pub first_run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_finish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_first_run_first_finish: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabStats {
    pub start_counts: i64,
    pub first_run: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_finish: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_first_run_first_finish: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_dttms: Option<HumanTimes>,
}

impl LabStats {
    fn from_row(row: StatResult, include_human: bool) -> Self {
        let human_dttms = include_human.then(|| HumanTimes {
            first_run: row.human_first_run,
            first_finish: row.human_first_finish,
            delta_first_run_first_finish: row.delta_seconds.map(format_duration),
        });

        Self {
            start_counts: row.start_count,
            first_run: row.first_run,
            first_finish: row.first_finish,
            delta_first_run_first_finish: row.delta_seconds,
            human_dttms,
        }
    }
}

/// student → "course/lab" → stats
pub type DetailedStats = BTreeMap<String, BTreeMap<String, LabStats>>;

/// Read-only view over a store, fixed to one pair of event markers.
pub struct StatsAggregator<'a> {
    store: &'a dyn ScoreStore,
    start_event: String,
    finish_event: String,
    format: TimestampFormat,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(
        store: &'a dyn ScoreStore,
        start_event: impl Into<String>,
        finish_event: impl Into<String>,
        format: TimestampFormat,
    ) -> Self {
        Self {
            store,
            start_event: start_event.into(),
            finish_event: finish_event.into(),
            format,
        }
    }

    /// Flat rows, ordered by (student, lab).
    pub fn rows(
        &self,
        ctx: &QueryContext,
        course: &str,
        include_human: bool,
    ) -> StoreResult<Vec<StatResult>> {
        self.store.get_detailed_stats(
            ctx,
            course,
            &self.start_event,
            &self.finish_event,
            &self.format,
            include_human,
        )
    }

    pub fn detailed_stats(
        &self,
        ctx: &QueryContext,
        course: &str,
        include_human: bool,
    ) -> StoreResult<DetailedStats> {
        let rows = self.rows(ctx, course, include_human)?;
        tracing::debug!(course, rows = rows.len(), "aggregating stats");

        let mut out: DetailedStats = BTreeMap::new();
        for row in rows {
            let key = format!("{}/{}", row.course, row.lab);
            let student = row.student.clone();
            out.entry(student)
                .or_default()
                .insert(key, LabStats::from_row(row, include_human));
        }
        Ok(out)
    }
}
