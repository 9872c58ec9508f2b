use super::validation::{check_course, check_lab, check_student};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

/// Manually assigned final grade; always wins over a computed score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub course: String,
    pub lab: String,
    pub student: String,
    pub score: i64,
    #[serde(default)]
    pub reason: String,
}

impl ScoreOverride {
    pub fn new(
        course: impl Into<String>,
        lab: impl Into<String>,
        student: impl Into<String>,
        score: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            course: course.into(),
            lab: lab.into(),
            student: student.into(),
            score,
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_course(&self.course)?;
        check_lab(&self.lab)?;
        check_student(&self.student)
    }
}
