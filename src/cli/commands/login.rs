use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{SessionController, SessionSettings};
use crate::errors::AppResult;
use crate::ui::messages::{status, success};
use std::time::Instant;

use super::{SessionFile, open_backend, read_password};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { email, password } = cmd {
        let password = read_password(password)?;

        let backend = open_backend(cfg)?;
        let mut ctrl = SessionController::new(&backend, SessionSettings::from_config(cfg));
        let path = cfg.session_file();

        // 1️⃣ close a previous session first
        if let Some(previous) = SessionFile::load(&path)?
            && ctrl.resume(&previous.token, Instant::now())?
        {
            ctrl.sign_out()?;
        }
        SessionFile::clear(&path)?;

        // 2️⃣ sign in
        ctrl.sign_in(email, &password, Instant::now())?;
        if let Some(identity) = ctrl.identity() {
            SessionFile::save(&path, identity)?;
        }

        status(ctrl.status());
        success(format!("Signed in as {}.", email));
        if ctrl.is_admin() {
            println!("🛡️  Administrator: `rhours admin users` lists all users.");
        }
    }

    Ok(())
}
