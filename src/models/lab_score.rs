use super::validation::{check_course, check_lab};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Grading configuration for one (course, lab) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabScore {
    pub course: String,
    pub lab: String,
    /// Maximum achievable points.
    pub base_score: i64,
    /// Inclusive cutoff, Unix seconds.
    pub deadline: i64,
}

impl LabScore {
    pub fn new(
        course: impl Into<String>,
        lab: impl Into<String>,
        base_score: i64,
        deadline: i64,
    ) -> Self {
        Self {
            course: course.into(),
            lab: lab.into(),
            base_score,
            deadline,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_course(&self.course)?;
        check_lab(&self.lab)?;
        if self.base_score < 0 {
            return Err(AppError::Validation(format!(
                "base score must not be negative (got {})",
                self.base_score
            )));
        }
        Ok(())
    }
}
