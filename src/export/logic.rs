// src/export/logic.rs

use crate::db::context::QueryContext;
use crate::db::repository::ScoreStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::csv::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::export_json;
use crate::export::model::SheetRow;
use crate::ui::messages::warning;
use std::collections::BTreeSet;
use std::path::Path;

/// Which students and labs end up on the sheet. Empty lists mean
/// "everything known for the course".
#[derive(Debug, Clone, Default)]
pub struct SheetSelection {
    pub students: Vec<String>,
    pub labs: Vec<String>,
}

/// High-level export driver. Only reads from the store.
pub struct ExportLogic;

impl ExportLogic {
    pub fn export(
        store: &dyn ScoreStore,
        ctx: &QueryContext,
        course: &str,
        selection: &SheetSelection,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows = Self::build_sheet(store, ctx, course, selection)?;

        if rows.is_empty() {
            warning(format!("No students or labs found for course '{course}'."));
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        tracing::info!(course, format = format.as_str(), rows = rows.len(), "sheet exported");
        Ok(rows.len())
    }

    /// One row per (student, lab), students outer, both ascending.
    pub fn build_sheet(
        store: &dyn ScoreStore,
        ctx: &QueryContext,
        course: &str,
        selection: &SheetSelection,
    ) -> AppResult<Vec<SheetRow>> {
        let (students, labs) = if selection.students.is_empty() || selection.labs.is_empty() {
            let entries = store.list_entries(ctx, course)?;
            let lab_scores = store.list_lab_scores(ctx, course)?;

            let students: BTreeSet<String> = if selection.students.is_empty() {
                entries.iter().map(|e| e.student.clone()).collect()
            } else {
                selection.students.iter().cloned().collect()
            };

            let labs: BTreeSet<String> = if selection.labs.is_empty() {
                lab_scores
                    .into_iter()
                    .map(|l| l.lab)
                    .chain(entries.into_iter().map(|e| e.lab))
                    .collect()
            } else {
                selection.labs.iter().cloned().collect()
            };

            (students, labs)
        } else {
            (
                selection.students.iter().cloned().collect(),
                selection.labs.iter().cloned().collect(),
            )
        };

        let mut rows = Vec::with_capacity(students.len() * labs.len());
        for lab in &labs {
            let base_score = store.get_lab_score(ctx, course, lab)?.map(|l| l.base_score);

            for student in &students {
                let finished = store
                    .get_student_finish_event(ctx, course, lab, student)?
                    .is_some();

                rows.push(SheetRow {
                    student: student.clone(),
                    lab: lab.clone(),
                    finished,
                    score: if finished { base_score } else { None },
                });
            }
        }

        rows.sort_by(|a, b| (&a.student, &a.lab).cmp(&(&b.student, &b.lab)));
        Ok(rows)
    }
}
