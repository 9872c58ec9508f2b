//! Whole-course score sheet.

use crate::core::grader::Grader;
use crate::db::context::QueryContext;
use crate::errors::StoreResult;
use std::collections::{BTreeMap, BTreeSet};

/// student → lab → score
pub type CourseScores = BTreeMap<String, BTreeMap<String, i64>>;

/// Score every (student, lab) pair that has a finish event.
///
/// A student whose scoring fails is logged and left out entirely; only a
/// failure to list the finish events aborts the sweep.
pub fn course_scores(
    grader: &Grader<'_>,
    ctx: &QueryContext,
    course: &str,
    finish_event: &str,
) -> StoreResult<CourseScores> {
    let events = grader
        .store()
        .get_course_events_by_type(ctx, course, finish_event)?;

    let pairs: BTreeSet<(String, String)> = events
        .into_iter()
        .map(|e| (e.student, e.lab))
        .collect();

    let mut scores: CourseScores = BTreeMap::new();
    let mut failed: BTreeSet<String> = BTreeSet::new();

    for (student, lab) in pairs {
        if failed.contains(&student) {
            continue;
        }

        match grader.score_for_student(ctx, course, &lab, &student) {
            Ok(score) => {
                scores.entry(student).or_default().insert(lab, score);
            }
            Err(err) => {
                tracing::warn!(course, %student, %lab, error = %err, "skipping student");
                scores.remove(&student);
                failed.insert(student);
            }
        }
    }

    Ok(scores)
}
