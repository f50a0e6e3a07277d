//! Document paths of the persisted records.

use crate::errors::{AppError, AppResult};

pub const USERS: &str = "users";
pub const PRESENCE: &str = "presence";

pub fn user_profile(uid: &str) -> String {
    format!("{USERS}/{uid}")
}

pub fn user_hours(uid: &str) -> String {
    format!("{USERS}/{uid}/data/hours")
}

pub fn presence(uid: &str) -> String {
    format!("{PRESENCE}/{uid}")
}

/// Split a document path into (collection, id).
///
/// `users/abc/data/hours` → (`users/abc/data`, `hours`)
pub fn split(path: &str) -> AppResult<(&str, &str)> {
    let segments: Vec<&str> = path.split('/').collect();

    if segments.len() < 2 || segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::Transport(format!("invalid document path '{}'", path)));
    }

    match path.rsplit_once('/') {
        Some((collection, id)) => Ok((collection, id)),
        None => Err(AppError::Transport(format!("invalid document path '{}'", path))),
    }
}
