use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::hours::ResetConfirmed;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::{info, status, success, warning};
use std::path::Path;

use super::{ask_confirmation, with_session};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, yes } = cmd {
        with_session(cfg, |ctrl| {
            // nothing is replaced unless the whole file is valid
            let imported = ExportLogic::import(Path::new(file))?;

            let current = ctrl.hours()?.len();
            if current > 0 {
                warning(format!(
                    "Importing replaces the {} day(s) currently recorded.",
                    current
                ));
                if !*yes && !ask_confirmation("Replace all hours?")? {
                    info("Import cancelled.");
                    return Ok(());
                }
            }

            let days = imported.len();
            ctrl.import_hours(imported, ResetConfirmed::granted())?;
            success(format!("Imported {} day(s) from {}.", days, file));
            status(ctrl.status());
            Ok(())
        })?;
    }

    Ok(())
}
