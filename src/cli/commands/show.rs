use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calendar::MonthCursor;
use crate::errors::{AppError, AppResult};
use crate::ui::calendar::render_month;
use crate::ui::messages::status;
use crate::utils::date::{parse_month, today};

use super::with_session;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { month } = cmd {
        with_session(cfg, |ctrl| {
            let policy = ctrl.settings().policy;

            let cursor = match month {
                Some(m) => {
                    let (year, month) =
                        parse_month(m).ok_or_else(|| AppError::InvalidMonth(m.clone()))?;
                    MonthCursor::new(year, month, &policy)?
                }
                None => MonthCursor::clamped(today(), &policy),
            };

            status(ctrl.status());
            let grid = ctrl.calendar(cursor.year, cursor.month)?;
            print!("{}", render_month(&grid, Some(&cursor)));
            Ok(())
        })?;
    }

    Ok(())
}
