use crate::errors::{AppError, AppResult};
use crate::export::model::HoursExport;
use std::fs;
use std::path::Path;

/// Write the export as pretty-printed JSON.
pub fn write_json(path: &Path, doc: &HoursExport) -> AppResult<()> {
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read an export file. A file without `hoursData` is rejected.
pub fn read_json(path: &Path) -> AppResult<HoursExport> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Export(format!("{}: not a valid hours export ({})", path.display(), e)))
}
