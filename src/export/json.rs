// src/export/json.rs

use crate::errors::AppResult;
use crate::export::{SheetRow, notify_export_success};
use crate::ui::messages::info;
use std::fs;
use std::path::Path;

pub(crate) fn export_json(rows: &[SheetRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)?;
    fs::write(path, json_data)?;

    notify_export_success("JSON", path, rows.len());
    Ok(())
}
