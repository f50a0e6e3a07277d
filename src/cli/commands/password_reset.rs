use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::remote::CredentialService;
use crate::ui::messages::{info, success};

use super::{SessionFile, open_backend};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::PasswordReset {
        email,
        code,
        new_password,
        show_mail,
    } = cmd
    {
        let backend = open_backend(cfg)?;

        //
        // 1) complete a reset
        //
        if let (Some(code), Some(new_password)) = (code, new_password) {
            backend.confirm_password_reset(code, new_password)?;
            // every session of the account was closed
            SessionFile::clear(&cfg.session_file())?;
            success("Password changed. Log in with the new password.");
            return Ok(());
        }

        let Some(email) = email else {
            return Err(AppError::validation(
                "Use --email to request a reset, or --code with --new-password to complete it.",
            ));
        };

        //
        // 2) read the local mail outbox
        //
        if *show_mail {
            let messages = backend.outbox(email)?;
            if messages.is_empty() {
                info(format!("No messages for {}.", email));
            }
            for m in messages {
                println!("📧 {}", m);
            }
            return Ok(());
        }

        //
        // 3) request a reset
        //
        backend.send_password_reset(email)?;
        success(format!("Password reset email sent to {}.", email));
    }

    Ok(())
}
