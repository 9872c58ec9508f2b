//! In-process store with the same ordering and upsert semantics as SQLite.
//! Useful for embedding the grader without a database file, and in tests.

use crate::db::context::QueryContext;
use crate::db::repository::{ScoreStore, render_human};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Entry, LabScore, ScoreOverride, StatResult};
use crate::utils::time::TimestampFormat;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    lab_scores: BTreeMap<(String, String), LabScore>,
    overrides: BTreeMap<(String, String, String), ScoreOverride>,
}

pub struct MemoryStore {
    state: RwLock<State>,
    finish_event: String,
}

impl MemoryStore {
    pub fn new(finish_event: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            finish_event: finish_event.into(),
        }
    }

    fn read(&self, ctx: &QueryContext) -> StoreResult<RwLockReadGuard<'_, State>> {
        ctx.acquire(|| self.state.try_read())
    }

    fn write(&self, ctx: &QueryContext) -> StoreResult<RwLockWriteGuard<'_, State>> {
        ctx.acquire(|| self.state.try_write())
    }

    /// Entries matching `keep`, ordered by (student, lab, timestamp).
    /// The sort is stable, so equal timestamps keep insertion order.
    fn sorted_entries<F>(&self, ctx: &QueryContext, keep: F) -> StoreResult<Vec<Entry>>
    where
        F: Fn(&Entry) -> bool,
    {
        let state = self.read(ctx)?;
        let mut out: Vec<Entry> = state.entries.iter().filter(|e| keep(e)).cloned().collect();
        out.sort_by(|a, b| {
            (&a.student, &a.lab, a.timestamp).cmp(&(&b.student, &b.lab, b.timestamp))
        });
        Ok(out)
    }
}

impl ScoreStore for MemoryStore {
    fn apply_migrations(&self, _dir: Option<&Path>) -> StoreResult<()> {
        Ok(())
    }

    fn finish_event_type(&self) -> &str {
        &self.finish_event
    }

    fn create_entry(&self, ctx: &QueryContext, entry: &Entry) -> StoreResult<()> {
        self.write(ctx)?.entries.push(entry.clone());
        Ok(())
    }

    fn get_student_finish_event(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<Entry>> {
        let state = self.read(ctx)?;
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                e.course == course
                    && e.lab == lab
                    && e.student == student
                    && e.event_type == self.finish_event
            })
            .min_by_key(|e| e.timestamp)
            .cloned())
    }

    fn list_entries(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<Entry>> {
        self.sorted_entries(ctx, |e| e.course == course)
    }

    fn get_score_override(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
        student: &str,
    ) -> StoreResult<Option<ScoreOverride>> {
        let state = self.read(ctx)?;
        let key = (course.to_string(), lab.to_string(), student.to_string());
        Ok(state.overrides.get(&key).cloned())
    }

    fn create_score_override(&self, ctx: &QueryContext, ov: &ScoreOverride) -> StoreResult<()> {
        let key = (ov.course.clone(), ov.lab.clone(), ov.student.clone());
        self.write(ctx)?.overrides.insert(key, ov.clone());
        Ok(())
    }

    fn list_course_score_overrides(
        &self,
        ctx: &QueryContext,
        course: &str,
    ) -> StoreResult<Vec<ScoreOverride>> {
        let state = self.read(ctx)?;
        Ok(state
            .overrides
            .values()
            .filter(|o| o.course == course)
            .cloned()
            .collect())
    }

    fn create_lab_score(&self, ctx: &QueryContext, lab_score: &LabScore) -> StoreResult<()> {
        let key = (lab_score.course.clone(), lab_score.lab.clone());
        self.write(ctx)?.lab_scores.insert(key, lab_score.clone());
        Ok(())
    }

    fn get_lab_score(
        &self,
        ctx: &QueryContext,
        course: &str,
        lab: &str,
    ) -> StoreResult<Option<LabScore>> {
        let state = self.read(ctx)?;
        Ok(state
            .lab_scores
            .get(&(course.to_string(), lab.to_string()))
            .cloned())
    }

    fn list_lab_scores(&self, ctx: &QueryContext, course: &str) -> StoreResult<Vec<LabScore>> {
        let state = self.read(ctx)?;
        Ok(state
            .lab_scores
            .values()
            .filter(|l| l.course == course)
            .cloned()
            .collect())
    }

    fn get_course_events_by_type(
        &self,
        ctx: &QueryContext,
        course: &str,
        event_type: &str,
    ) -> StoreResult<Vec<Entry>> {
        self.sorted_entries(ctx, |e| e.course == course && e.event_type == event_type)
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
        // (student, lab) -> (start_count, first_run, first_finish)
        let mut groups: BTreeMap<(String, String), (i64, Option<i64>, Option<i64>)> =
            BTreeMap::new();

        {
            let state = self.read(ctx)?;
            for e in state.entries.iter().filter(|e| e.course == course) {
                let is_start = e.event_type == start_event_type;
                let is_finish = e.event_type == finish_event_type;
                if !is_start && !is_finish {
                    continue;
                }

                let slot = groups
                    .entry((e.student.clone(), e.lab.clone()))
                    .or_insert((0, None, None));

                if is_start {
                    slot.0 += 1;
                    slot.1 = Some(slot.1.map_or(e.timestamp, |t| t.min(e.timestamp)));
                }
                if is_finish {
                    slot.2 = Some(slot.2.map_or(e.timestamp, |t| t.min(e.timestamp)));
                }
            }
        }

        let mut rows: Vec<StatResult> = groups
            .into_iter()
            .filter_map(|((student, lab), (start_count, first_run, first_finish))| {
                // rows exist only for groups with at least one start event
                let first_run = first_run?;
                Some(StatResult {
                    student,
                    lab,
                    course: course.to_string(),
                    start_count,
                    first_run,
                    first_finish,
                    delta_seconds: first_finish.map(|f| f - first_run),
                    human_first_run: None,
                    human_first_finish: None,
                })
            })
            .collect();

        if include_human {
            render_human(&mut rows, timestamp_format);
        }
        Ok(rows)
    }
}
