use serde::Serialize;

/// Per (student, lab, course) timing summary derived from raw entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatResult {
    pub student: String,
    pub lab: String,
    pub course: String,
    pub start_count: i64,
    pub first_run: i64,
    pub first_finish: Option<i64>,
    /// `first_finish - first_run`; negative when the data says the lab was
    /// finished before it was started.
    pub delta_seconds: Option<i64>,
    pub human_first_run: Option<String>,
    pub human_first_finish: Option<String>,
}
