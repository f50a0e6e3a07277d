// src/export/logic.rs

use crate::core::hours::HoursMap;
use crate::errors::AppResult;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::{read_json, write_json};
use crate::export::model::HoursExport;
use crate::utils::formatting::sanitize_email;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Default file name: `hours-<email|guest>-<YYYY-MM-DD>.json`.
pub fn export_file_name(email: Option<&str>, today: NaiveDate) -> String {
    let who = email
        .filter(|e| !e.trim().is_empty())
        .map(sanitize_email)
        .unwrap_or_else(|| "guest".to_string());
    format!("hours-{}-{}.json", who, today.format("%Y-%m-%d"))
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write the hours map to `file`, or to the default name in the
    /// current directory. Returns the written path.
    pub fn export(
        hours: &HoursMap,
        email: Option<&str>,
        today: NaiveDate,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let path = match file {
            Some(f) => PathBuf::from(f),
            None => PathBuf::from(export_file_name(email, today)),
        };

        ensure_writable(&path, force)?;
        write_json(&path, &HoursExport::from(hours))?;

        Ok(path)
    }

    /// Read and validate an export file. One malformed entry rejects the
    /// whole file, so nothing is imported.
    pub fn import(path: &Path) -> AppResult<HoursMap> {
        let doc = read_json(path)?;
        HoursMap::from_wire_checked(&doc.hours_data)
    }
}
