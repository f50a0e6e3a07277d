use crate::core::status::SyncStatus;
use crate::utils::colors::{BLUE, GREEN, GREY, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", RED, BOLD, ICON_ERR, RESET, msg);
}

/// Print the sync indicator after a remote operation. Idle prints nothing.
pub fn status(s: &SyncStatus) {
    let Some(label) = s.label() else {
        return;
    };

    match s {
        SyncStatus::Failed(_) => warning(label),
        SyncStatus::Saved => println!("{}💾 {}{}", GREY, label, RESET),
        _ => println!("{}⏳ {}{}", GREY, label, RESET),
    }
}
