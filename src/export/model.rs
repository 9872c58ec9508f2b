// src/export/model.rs

use serde::Serialize;

/// One cell of the completion sheet: did `student` finish `lab`, and what
/// the lab is worth.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SheetRow {
    pub student: String,
    pub lab: String,
    pub finished: bool,
    /// Base score of the lab when the student finished it and the lab
    /// has a score configured.
    pub score: Option<i64>,
}
