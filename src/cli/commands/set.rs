use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::hours::{DayState, parse_hours_input};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{status, success};
use crate::utils::date::{long_date, parse_date};
use crate::utils::format_hours;

use super::with_session;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Set { date, hours } = cmd {
        let day = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
        let value = parse_hours_input(hours)?;

        with_session(cfg, |ctrl| {
            ctrl.set_day_hours(day, value)?;

            let label = match ctrl.hours()?.state(day) {
                DayState::Absent => "absent".to_string(),
                DayState::Worked(h) => format!("{}h", format_hours(h)),
                DayState::Unrecorded => "-".to_string(),
            };
            success(format!("{}: {}", long_date(day), label));
            status(ctrl.status());
            Ok(())
        })?;
    }

    Ok(())
}
