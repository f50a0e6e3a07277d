//! One handler per subcommand, plus the helpers they share.

pub mod admin;
pub mod config;
pub mod db;
pub mod export;
pub mod grant_admin;
pub mod import;
pub mod init;
pub mod log;
pub mod login;
pub mod logout;
pub mod password_reset;
pub mod previous;
pub mod register;
pub mod reset;
pub mod set;
pub mod show;
pub mod summary;
pub mod watch;

use crate::config::Config;
use crate::core::session::{SessionController, SessionSettings};
use crate::db::LocalBackend;
use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Session token persisted between invocations.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionFile {
    pub token: String,
    pub uid: String,
    pub email: Option<String>,
}

impl SessionFile {
    pub fn load(path: &Path) -> AppResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        // an unreadable file is a stale session
        Ok(serde_json::from_str(&content).ok())
    }

    pub fn save(path: &Path, identity: &Identity) -> AppResult<()> {
        let file = SessionFile {
            token: identity.token.clone(),
            uid: identity.uid.clone(),
            email: identity.email.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn clear(path: &Path) -> AppResult<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub(crate) fn ask_confirmation(prompt: &str) -> AppResult<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();
    Ok(ans == "y" || ans == "yes")
}

/// Password from the flag, or the first line of stdin.
pub(crate) fn read_password(flag: &Option<String>) -> AppResult<String> {
    if let Some(p) = flag {
        return Ok(p.clone());
    }

    print!("Password: ");
    io::stdout().flush().ok();

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Open the backend named by the configuration.
pub(crate) fn open_backend(cfg: &Config) -> AppResult<LocalBackend> {
    LocalBackend::open(cfg)
}

/// Resume the persisted session and run `f` on the signed-in controller.
pub(crate) fn with_session<T>(
    cfg: &Config,
    f: impl FnOnce(&mut SessionController<'_, LocalBackend>) -> AppResult<T>,
) -> AppResult<T> {
    let backend = open_backend(cfg)?;
    let mut ctrl = SessionController::new(&backend, SessionSettings::from_config(cfg));

    let path = cfg.session_file();
    let Some(session) = SessionFile::load(&path)? else {
        return Err(AppError::NotSignedIn);
    };

    if !ctrl.resume(&session.token, Instant::now())? {
        SessionFile::clear(&path)?;
        return Err(AppError::NotSignedIn);
    }

    f(&mut ctrl)
}
