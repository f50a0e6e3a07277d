use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::hours::ResetConfirmed;
use crate::errors::AppResult;
use crate::ui::messages::{info, status, success, warning};

use super::{ask_confirmation, with_session};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { yes } = cmd {
        with_session(cfg, |ctrl| {
            let days = ctrl.hours()?.len();
            if days == 0 {
                info("Nothing to reset.");
                return Ok(());
            }

            warning(format!(
                "This deletes all {} recorded day(s). It cannot be undone.",
                days
            ));
            if !*yes && !ask_confirmation("Reset all hours?")? {
                info("Reset cancelled.");
                return Ok(());
            }

            ctrl.reset_all(ResetConfirmed::granted())?;
            success("All hours cleared.");
            status(ctrl.status());
            Ok(())
        })?;
    }

    Ok(())
}
