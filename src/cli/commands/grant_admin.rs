use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::claims::{set_admin_claim, uid_for_email};
use crate::errors::{AppError, AppResult, auth_codes};
use crate::ui::messages::success;

use super::open_backend;

/// Operator tool: works on the database directly, no session involved.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::GrantAdmin { user, revoke } = cmd {
        let backend = open_backend(cfg)?;

        let uid = if user.contains('@') {
            uid_for_email(&backend, user)?.ok_or_else(|| AppError::auth(auth_codes::EMAIL_NOT_FOUND))?
        } else {
            user.clone()
        };

        set_admin_claim(&backend, &uid, !*revoke)?;

        if *revoke {
            success(format!("Admin claim revoked for {}.", user));
        } else {
            success(format!("Admin claim granted to {}.", user));
        }
    }

    Ok(())
}
