use super::validation::{check_course, check_lab, check_student};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

/// One observed lab lifecycle event.
///
/// Entries are append-only; several may exist for the same
/// (course, lab, student) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: i64,     // ⇔ entries.timestamp (Unix seconds)
    pub event_type: String, // ⇔ entries.event_type
    pub lab: String,
    pub student: String,
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    pub fn new(
        timestamp: i64,
        event_type: impl Into<String>,
        course: impl Into<String>,
        lab: impl Into<String>,
        student: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            event_type: event_type.into(),
            lab: lab.into(),
            student: student.into(),
            course: course.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Shape checks applied before the entry is handed to a store.
    pub fn validate(&self) -> AppResult<()> {
        check_course(&self.course)?;
        check_lab(&self.lab)?;
        check_student(&self.student)?;
        if self.event_type.trim().is_empty() {
            return Err(crate::errors::AppError::Validation(
                "event type must not be empty".into(),
            ));
        }
        Ok(())
    }
}
