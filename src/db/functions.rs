//! Server-side operations that require the admin claim.

use crate::db::backend::LocalBackend;
use crate::errors::{AppError, AppResult, auth_codes};
use crate::models::identity::Identity;
use crate::remote::{DocumentStore, OperationLog, PrivilegedFunctions, paths};

impl LocalBackend {
    /// Check the caller's token and current admin flag on the account.
    fn require_admin(&self, caller: &Identity) -> AppResult<()> {
        match self.session_uid(&caller.token)? {
            Some(uid) if uid == caller.uid => {}
            _ => return Err(AppError::auth(auth_codes::INVALID_ID_TOKEN)),
        }

        match self.account_admin(&caller.uid)? {
            Some(true) => Ok(()),
            _ => Err(AppError::Authorization(
                "Only administrators can delete accounts.".into(),
            )),
        }
    }
}

impl PrivilegedFunctions for LocalBackend {
    fn delete_credential(&self, caller: &Identity, uid: &str) -> AppResult<()> {
        self.require_admin(caller)?;

        let user_docs = [paths::user_hours(uid), paths::user_profile(uid), paths::presence(uid)];

        let tx = self.pool.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM accounts WHERE uid = ?1", [uid])?;
        tx.execute("DELETE FROM sessions WHERE uid = ?1", [uid])?;
        tx.execute("DELETE FROM password_resets WHERE uid = ?1", [uid])?;
        tx.commit()?;

        // a credential already gone still lets leftover documents go
        if removed == 0 {
            let mut has_docs = false;
            for path in &user_docs {
                has_docs |= self.get(path)?.is_some();
            }
            if !has_docs {
                return Err(AppError::auth(auth_codes::USER_NOT_FOUND));
            }
        }

        // the client removes the documents too, a failure here is not fatal
        for path in &user_docs {
            if let Err(e) = self.delete(path) {
                self.record("delete_credential", uid, &format!("could not delete {}: {}", path, e));
            }
        }

        self.record(
            "delete_credential",
            uid,
            &format!("credential deleted by {}", caller.uid),
        );
        Ok(())
    }
}
