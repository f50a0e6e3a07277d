use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

use super::{SessionFile, with_session};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let path = cfg.session_file();

    match with_session(cfg, |ctrl| ctrl.sign_out()) {
        Ok(()) => {
            SessionFile::clear(&path)?;
            success("Signed out.");
            Ok(())
        }
        Err(AppError::NotSignedIn) => {
            info("Not signed in.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
