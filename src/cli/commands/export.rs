use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::{ExportLogic, notify_export_success};
use crate::ui::messages::warning;
use crate::utils::date::today;

use super::with_session;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { file, force } = cmd {
        with_session(cfg, |ctrl| {
            let hours = ctrl.hours()?;
            if hours.is_empty() {
                warning("No hours recorded, the export will be empty.");
            }

            let email = ctrl.identity().and_then(|i| i.email.as_deref());
            let path = ExportLogic::export(hours, email, today(), file.as_deref(), *force)?;
            notify_export_success(&path);
            Ok(())
        })?;
    }

    Ok(())
}
