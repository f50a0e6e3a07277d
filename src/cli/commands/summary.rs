use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::status;
use crate::ui::summary::render_summary;

use super::with_session;

pub fn handle(cfg: &Config) -> AppResult<()> {
    with_session(cfg, |ctrl| {
        status(ctrl.status());
        let summary = ctrl.summary()?;
        print!("{}", render_summary(&summary, ctrl.settings().projector.cap));
        Ok(())
    })
}
