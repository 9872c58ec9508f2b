//! Deadline-aware scoring.

use crate::db::context::QueryContext;
use crate::db::repository::ScoreStore;
use crate::errors::ScoreError;
use crate::utils::time::SECONDS_PER_DAY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Late-penalty rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Exact day-count → point delta (usually negative).
    #[serde(default = "default_modifiers")]
    pub late_days_modifiers: BTreeMap<u64, i64>,
    /// Multiplier in (0, 1] for late days not covered by the table.
    #[serde(default = "default_late_penalty")]
    pub default_late_penalty: f64,
    /// Days of lateness after which `extra_late_penalty` also applies.
    #[serde(default = "default_max_late_days")]
    pub max_late_days: u64,
    #[serde(default = "default_extra_late_penalty")]
    pub extra_late_penalty: i64,
}

fn default_modifiers() -> BTreeMap<u64, i64> {
    BTreeMap::from([(1, -1), (2, -2), (3, -3)])
}
fn default_late_penalty() -> f64 {
    0.7
}
fn default_max_late_days() -> u64 {
    7
}
fn default_extra_late_penalty() -> i64 {
    1
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            late_days_modifiers: default_modifiers(),
            default_late_penalty: default_late_penalty(),
            max_late_days: default_max_late_days(),
            extra_late_penalty: default_extra_late_penalty(),
        }
    }
}

impl ScoringPolicy {
    /// Whole days late, rounded up: one second past the deadline is one day.
    /// `None` when the submission is on time.
    pub fn days_late(deadline: i64, submit_time: i64) -> Option<u64> {
        if submit_time <= deadline {
            return None;
        }
        let late_by = submit_time.abs_diff(deadline);
        Some(late_by.div_ceil(SECONDS_PER_DAY as u64))
    }

    /// Final grade for a submission at `submit_time`; never below zero
    /// once a penalty applies.
    pub fn calculate_score(&self, base_score: i64, deadline: i64, submit_time: i64) -> i64 {
        let Some(delta_days) = Self::days_late(deadline, submit_time) else {
            return base_score;
        };

        if let Some(modifier) = self.late_days_modifiers.get(&delta_days) {
            return base_score.saturating_add(*modifier).max(0);
        }

        // truncates toward zero
        let penalized = (base_score as f64 * self.default_late_penalty) as i64;

        if delta_days <= self.max_late_days {
            penalized.max(0)
        } else {
            penalized.saturating_sub(self.extra_late_penalty).max(0)
        }
    }
}

/// Score lookup for one student: override, then finish event, then lab config.
///
/// Holds only borrowed, read-only state; build one per request or share it.
pub struct Grader<'a> {
    store: &'a dyn ScoreStore,
    policy: &'a ScoringPolicy,
}

impl<'a> Grader<'a> {
    pub fn new(store: &'a dyn ScoreStore, policy: &'a ScoringPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store
    }

    pub fn calculate_score(&self, base_score: i64, deadline: i64, submit_time: i64) -> i64 {
        self.policy
            .calculate_score(base_score, deadline, submit_time)
    }

    /// `0` for a student who never finished or a lab without a score config.
    pub fn score_for_student(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> Result<i64, ScoreError> {
        if let Some(ov) = self
            .store
            .get_score_override(ctx, course, lab, student)
            .map_err(ScoreError::Override)?
        {
            return Ok(ov.score);
        }

        let Some(finish) = self
            .store
            .get_student_finish_event(ctx, course, lab, student)
            .map_err(ScoreError::FinishEvent)?
        else {
            return Ok(0);
        };

        let Some(lab_score) = self
            .store
            .get_lab_score(ctx, course, lab)
            .map_err(ScoreError::LabScore)?
        else {
            return Ok(0);
        };

        Ok(self.calculate_score(lab_score.base_score, lab_score.deadline, finish.timestamp))
    }
}
