use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{RegisterOutcome, SessionController, SessionSettings};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::time::Instant;

use super::{SessionFile, open_backend, read_password};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Register { email, password } = cmd {
        let password = read_password(password)?;

        let backend = open_backend(cfg)?;
        let mut ctrl = SessionController::new(&backend, SessionSettings::from_config(cfg));

        match ctrl.register(email, &password, Instant::now())? {
            RegisterOutcome::SignedIn => {
                if let Some(identity) = ctrl.identity() {
                    SessionFile::save(&cfg.session_file(), identity)?;
                }
                success(format!("Account created. Signed in as {}.", email));
            }
            RegisterOutcome::CreatedOnly(e) => {
                warning(format!(
                    "Account created, but signing in failed: {}. Run `rhours login {}`.",
                    e, email
                ));
            }
        }
    }

    Ok(())
}
