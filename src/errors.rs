//! Unified application error type.
//! All modules (db, remote, core, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Parsing / validation errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid month format: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("{0}")]
    Validation(String),

    // ---------------------------
    // Remote service errors
    // ---------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{}", auth_message(.code))]
    Auth { code: String },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Not signed in. Run `rhours login` first.")]
    NotSignedIn,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Error codes raised by the credential service.
pub mod auth_codes {
    pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";
    pub const INVALID_EMAIL: &str = "INVALID_EMAIL";
    pub const WEAK_PASSWORD: &str = "WEAK_PASSWORD";
    pub const OPERATION_NOT_ALLOWED: &str = "OPERATION_NOT_ALLOWED";
    pub const INVALID_LOGIN_CREDENTIALS: &str = "INVALID_LOGIN_CREDENTIALS";
    pub const USER_DISABLED: &str = "USER_DISABLED";
    pub const EMAIL_NOT_FOUND: &str = "EMAIL_NOT_FOUND";
    pub const INVALID_OOB_CODE: &str = "INVALID_OOB_CODE";
    pub const INVALID_ID_TOKEN: &str = "INVALID_ID_TOKEN";
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
}

impl AppError {
    pub fn auth(code: &str) -> Self {
        AppError::Auth {
            code: code.to_string(),
        }
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }
}

/// Map a credential-service error code to a user-facing message.
/// Unknown codes keep the raw code so they can be diagnosed.
pub fn auth_message(code: &str) -> String {
    use auth_codes::*;

    let friendly = match code {
        EMAIL_EXISTS => "Email already in use.",
        INVALID_EMAIL => "Invalid email address.",
        WEAK_PASSWORD => "Password too weak.",
        OPERATION_NOT_ALLOWED => "Email/password sign-in is disabled.",
        INVALID_LOGIN_CREDENTIALS => "Wrong email or password.",
        USER_DISABLED => "This account has been disabled.",
        EMAIL_NOT_FOUND => "No account registered with this email.",
        INVALID_OOB_CODE => "The reset code is invalid or already used.",
        INVALID_ID_TOKEN => "Your session has expired. Please log in again.",
        USER_NOT_FOUND => "User not found.",
        _ => return format!("Authentication failed. ({})", code),
    };

    friendly.to_string()
}
