#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rhours::config::Config;
use rhours::core::session::{SessionController, SessionSettings};
use rhours::db::LocalBackend;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

pub const PASSWORD: &str = "secret123";

pub fn rhr() -> Command {
    cargo_bin_cmd!("rhours")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing file together with its session file.
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rhours.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{}.session", db_path)).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB and register (and sign in) one user through the CLI.
pub fn init_with_user(db_path: &str, email: &str) {
    rhr()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rhr()
        .args(["--db", db_path, "register", email, "--password", PASSWORD])
        .assert()
        .success();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Default settings with a 30 s heartbeat.
pub fn settings() -> SessionSettings {
    SessionSettings::from_config(&Config::default())
}

pub fn backend() -> LocalBackend {
    LocalBackend::in_memory().expect("in-memory backend")
}

/// Register `email` and leave a signed-in controller.
pub fn signed_in<'a>(backend: &'a LocalBackend, email: &str) -> SessionController<'a, LocalBackend> {
    let mut ctrl = SessionController::new(backend, settings());
    ctrl.register(email, PASSWORD, Instant::now())
        .expect("register");
    assert!(ctrl.is_signed_in());
    ctrl
}
