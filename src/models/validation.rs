//! Shape checks for identifiers coming from operators or the autograder.

use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_LAB_LEN: usize = 3;
pub const MAX_COURSE_LEN: usize = 6;

static STUDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w-]+\..+$").expect("student pattern is a valid regex")
});

pub fn check_student(student: &str) -> AppResult<()> {
    if STUDENT_RE.is_match(student) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "student '{}' must look like firstname.lastname",
            student
        )))
    }
}

pub fn check_lab(lab: &str) -> AppResult<()> {
    check_code("lab", lab, MAX_LAB_LEN)
}

pub fn check_course(course: &str) -> AppResult<()> {
    check_code("course", course, MAX_COURSE_LEN)
}

fn check_code(what: &str, value: &str, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(AppError::Validation(format!(
            "{} code '{}' must be 1 to {} characters",
            what, value, max
        )));
    }
    Ok(())
}
