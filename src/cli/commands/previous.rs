use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::format_hours;

use super::with_session;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Previous { hours } = cmd {
        let value: f64 = hours.trim().parse().map_err(|_| {
            AppError::validation("Please enter a valid number of hours (>= 0).")
        })?;

        with_session(cfg, |ctrl| {
            ctrl.set_previous_hours(value)?;
            success(format!("Previous hours set to {}.", format_hours(value)));
            Ok(())
        })?;
    }

    Ok(())
}
