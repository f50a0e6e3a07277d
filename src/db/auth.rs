//! Credential service: accounts, sessions, claims and password resets.

use crate::db::backend::{LocalBackend, random_hex};
use crate::errors::{AppError, AppResult, auth_codes};
use crate::models::identity::{Claims, Identity};
use crate::remote::{CredentialService, OperationLog};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use regex::Regex;
use rusqlite::{OptionalExtension, params};
use sha2::Sha256;
use std::sync::OnceLock;

const PBKDF2_ITERATIONS: u32 = 20_000;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn hash_password(password: &str) -> (String, String, u32) {
    let mut salt = [0u8; 16];
    rand::rng().fill_bytes(&mut salt);
    let key = derive_key(password, &salt, PBKDF2_ITERATIONS);
    (B64.encode(salt), B64.encode(key), PBKDF2_ITERATIONS)
}

fn verify_password(password: &str, salt_b64: &str, hash_b64: &str, iterations: u32) -> bool {
    let (Ok(salt), Ok(expected)) = (B64.decode(salt_b64), B64.decode(hash_b64)) else {
        return false;
    };
    let key = derive_key(password, &salt, iterations);
    key.as_slice() == expected.as_slice()
}

struct AccountRow {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
    iterations: u32,
    admin: bool,
    disabled: bool,
}

impl LocalBackend {
    fn account_by_email(&self, email: &str) -> AppResult<Option<AccountRow>> {
        let row = self
            .pool
            .conn
            .query_row(
                "SELECT uid, email, salt, password_hash, iterations, admin, disabled
                 FROM accounts WHERE email = ?1",
                [email],
                |r| {
                    Ok(AccountRow {
                        uid: r.get(0)?,
                        email: r.get(1)?,
                        salt: r.get(2)?,
                        password_hash: r.get(3)?,
                        iterations: r.get(4)?,
                        admin: r.get::<_, i64>(5)? == 1,
                        disabled: r.get::<_, i64>(6)? == 1,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub(crate) fn account_admin(&self, uid: &str) -> AppResult<Option<bool>> {
        let admin: Option<i64> = self
            .pool
            .conn
            .query_row("SELECT admin FROM accounts WHERE uid = ?1", [uid], |r| r.get(0))
            .optional()?;
        Ok(admin.map(|a| a == 1))
    }

    /// Uid behind a live session token.
    pub(crate) fn session_uid(&self, token: &str) -> AppResult<Option<String>> {
        let uid = self
            .pool
            .conn
            .query_row("SELECT uid FROM sessions WHERE token = ?1", [token], |r| r.get(0))
            .optional()?;
        Ok(uid)
    }

    pub fn account_exists(&self, uid: &str) -> AppResult<bool> {
        Ok(self.account_admin(uid)?.is_some())
    }

    /// Messages queued for `email` by the local mail stand-in, newest last.
    pub fn outbox(&self, email: &str) -> AppResult<Vec<String>> {
        let mut stmt = self
            .pool
            .conn
            .prepare("SELECT body FROM mail_outbox WHERE recipient = ?1 ORDER BY id ASC")?;
        let rows = stmt.query_map([normalize_email(email)], |r| r.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Complete a password reset with the code that was mailed.
    pub fn confirm_password_reset(&self, code: &str, new_password: &str) -> AppResult<()> {
        if new_password.chars().count() < self.min_password_length {
            return Err(AppError::auth(auth_codes::WEAK_PASSWORD));
        }

        let uid: Option<String> = self
            .pool
            .conn
            .query_row(
                "SELECT uid FROM password_resets WHERE code = ?1 AND used = 0",
                [code.trim()],
                |r| r.get(0),
            )
            .optional()?;
        let Some(uid) = uid else {
            return Err(AppError::auth(auth_codes::INVALID_OOB_CODE));
        };

        let (salt, hash, iterations) = hash_password(new_password);

        let tx = self.pool.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE accounts SET salt = ?1, password_hash = ?2, iterations = ?3 WHERE uid = ?4",
            params![salt, hash, iterations, uid],
        )?;
        tx.execute("UPDATE password_resets SET used = 1 WHERE code = ?1", [code.trim()])?;
        // existing sessions stop working after a reset
        tx.execute("DELETE FROM sessions WHERE uid = ?1", [&uid])?;
        tx.commit()?;

        self.record("password_reset", &uid, "password changed");
        Ok(())
    }
}

impl CredentialService for LocalBackend {
    fn create_account(&self, email: &str, password: &str) -> AppResult<String> {
        let email = normalize_email(email);

        if !email_regex().is_match(&email) {
            return Err(AppError::auth(auth_codes::INVALID_EMAIL));
        }
        if password.chars().count() < self.min_password_length {
            return Err(AppError::auth(auth_codes::WEAK_PASSWORD));
        }
        if self.account_by_email(&email)?.is_some() {
            return Err(AppError::auth(auth_codes::EMAIL_EXISTS));
        }

        let uid = random_hex(14);
        let (salt, hash, iterations) = hash_password(password);

        self.pool.conn.execute(
            "INSERT INTO accounts (uid, email, salt, password_hash, iterations, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![uid, email, salt, hash, iterations, Self::now_rfc3339()],
        )?;

        self.record("register", &uid, &email);
        Ok(uid)
    }

    fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let email = normalize_email(email);

        let Some(acc) = self.account_by_email(&email)? else {
            return Err(AppError::auth(auth_codes::INVALID_LOGIN_CREDENTIALS));
        };
        if !verify_password(password, &acc.salt, &acc.password_hash, acc.iterations) {
            return Err(AppError::auth(auth_codes::INVALID_LOGIN_CREDENTIALS));
        }
        if acc.disabled {
            return Err(AppError::auth(auth_codes::USER_DISABLED));
        }

        let token = random_hex(32);
        self.pool.conn.execute(
            "INSERT INTO sessions (token, uid, admin, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![token, acc.uid, acc.admin as i64, Self::now_rfc3339()],
        )?;

        Ok(Identity {
            uid: acc.uid,
            email: Some(acc.email),
            token,
        })
    }

    fn sign_out(&self, identity: &Identity) -> AppResult<()> {
        self.pool
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1", [&identity.token])?;
        Ok(())
    }

    fn send_password_reset(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let Some(acc) = self.account_by_email(&email)? else {
            return Err(AppError::auth(auth_codes::EMAIL_NOT_FOUND));
        };

        let code = random_hex(6).to_uppercase();
        let now = Self::now_rfc3339();

        let tx = self.pool.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO password_resets (code, uid, created_at) VALUES (?1, ?2, ?3)",
            params![code, acc.uid, now],
        )?;
        tx.execute(
            "INSERT INTO mail_outbox (recipient, subject, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                acc.email,
                "Reset your password",
                format!(
                    "Use code {} with `rhours password-reset --code {} --new-password <PASSWORD>`.",
                    code, code
                ),
                now
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn restore(&self, token: &str) -> AppResult<Option<Identity>> {
        let row: Option<(String, String, i64)> = self
            .pool
            .conn
            .query_row(
                "SELECT a.uid, a.email, a.disabled
                 FROM sessions s JOIN accounts a ON a.uid = s.uid
                 WHERE s.token = ?1",
                [token],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;

        Ok(match row {
            Some((uid, email, 0)) => Some(Identity {
                uid,
                email: Some(email),
                token: token.to_string(),
            }),
            _ => None,
        })
    }

    fn identity_claims(&self, identity: &Identity, force_refresh: bool) -> AppResult<Claims> {
        let cached: Option<i64> = self
            .pool
            .conn
            .query_row(
                "SELECT admin FROM sessions WHERE token = ?1 AND uid = ?2",
                [&identity.token, &identity.uid],
                |r| r.get(0),
            )
            .optional()?;
        let Some(cached) = cached else {
            return Err(AppError::auth(auth_codes::INVALID_ID_TOKEN));
        };

        if !force_refresh {
            return Ok(Claims { admin: cached == 1 });
        }

        let Some(admin) = self.account_admin(&identity.uid)? else {
            return Err(AppError::auth(auth_codes::USER_NOT_FOUND));
        };
        self.pool.conn.execute(
            "UPDATE sessions SET admin = ?1 WHERE token = ?2",
            params![admin as i64, identity.token],
        )?;

        Ok(Claims { admin })
    }
}
