use crate::cli::parser::{AdminCommands, Commands};
use crate::config::Config;
use crate::core::admin::{AdminDirectory, DirectoryCounts, RefreshOutcome};
use crate::errors::AppResult;
use crate::ui::directory::render_directory;
use crate::ui::messages::{info, success, warning};
use chrono::Utc;

use super::{ask_confirmation, with_session};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Admin { action } = cmd else {
        return Ok(());
    };

    match action {
        AdminCommands::Users { online } => list_users(cfg, *online),
        AdminCommands::Delete { uid, yes } => delete_user(cfg, uid, *yes),
    }
}

fn list_users(cfg: &Config, online_only: bool) -> AppResult<()> {
    with_session(cfg, |ctrl| {
        let stale_after = ctrl.settings().presence_stale;

        if let RefreshOutcome::Skipped = ctrl.refresh_directory()? {
            info("A refresh is already running.");
        }
        let dir = ctrl.admin()?;

        let (entries, counts) = if online_only {
            let entries = AdminDirectory::list_users(ctrl.backend(), true)?;
            let counts = DirectoryCounts {
                total: dir.counts().total,
                online: entries.len(),
            };
            (entries, counts)
        } else {
            (dir.entries().to_vec(), dir.counts())
        };

        print!(
            "{}",
            render_directory(&entries, counts, Utc::now(), stale_after)
        );
        Ok(())
    })
}

fn delete_user(cfg: &Config, uid: &str, yes: bool) -> AppResult<()> {
    with_session(cfg, |ctrl| {
        let dir = ctrl.admin()?;
        let email = dir
            .entries()
            .iter()
            .find(|e| e.uid == uid)
            .and_then(|e| e.email.clone())
            .unwrap_or_else(|| uid.to_string());

        warning(format!(
            "This deletes the account {} with all its hours. It cannot be undone.",
            email
        ));
        if !yes && !ask_confirmation("Delete this account?")? {
            info("Deletion cancelled.");
            return Ok(());
        }

        ctrl.delete_account(uid)?;
        success(format!("Account {} deleted.", email));
        Ok(())
    })
}
