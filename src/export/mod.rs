// src/export/mod.rs

mod fs_utils;
pub mod json;
pub mod logic;
pub mod model;

pub use logic::{ExportLogic, export_file_name};
pub use model::HoursExport;

use crate::ui::messages::success;
use std::path::Path;

pub(crate) fn notify_export_success(path: &Path) {
    success(format!("Export completed: {}", path.display()));
}
