// src/export/csv.rs

use crate::errors::AppResult;
use crate::export::{SheetRow, notify_export_success};
use crate::ui::messages::info;
use std::path::Path;

/// Header comes from the `SheetRow` field names.
pub(crate) fn export_csv(rows: &[SheetRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path, rows.len());
    Ok(())
}
