//! Operator tool for the admin claim.

use crate::db::backend::LocalBackend;
use crate::errors::{AppError, AppResult, auth_codes};
use crate::remote::{DocumentStore, Fields, OperationLog, SetOptions, paths};
use rusqlite::params;
use serde_json::Value;

/// Grant or revoke the admin claim of `uid`.
///
/// The flag on the profile document is mirrored for display only; the
/// account row stays the source of truth. Signed-in sessions pick the new
/// value up on their next forced claims refresh.
pub fn set_admin_claim(backend: &LocalBackend, uid: &str, admin: bool) -> AppResult<()> {
    let updated = backend.pool.conn.execute(
        "UPDATE accounts SET admin = ?1 WHERE uid = ?2",
        params![admin as i64, uid],
    )?;
    if updated == 0 {
        return Err(AppError::auth(auth_codes::USER_NOT_FOUND));
    }

    let profile = paths::user_profile(uid);
    if backend.get(&profile)?.is_some() {
        let mut fields = Fields::new();
        fields.insert("admin".into(), Value::Bool(admin));
        backend.set(&profile, fields, SetOptions::merge())?;
    }

    let message = if admin { "admin claim granted" } else { "admin claim revoked" };
    backend.record("grant_admin", uid, message);
    Ok(())
}

/// Uid of the account registered with `email`.
pub fn uid_for_email(backend: &LocalBackend, email: &str) -> AppResult<Option<String>> {
    use rusqlite::OptionalExtension;

    let uid = backend
        .pool
        .conn
        .query_row(
            "SELECT uid FROM accounts WHERE email = ?1",
            [email.trim().to_lowercase()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(uid)
}
