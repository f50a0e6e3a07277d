//! SQLite implementation of the hosted service contracts.

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::remote::{ChangeBatch, OperationLog};
use crate::utils::path::expand_tilde;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::RngCore;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::mpsc::Sender;

/// Live change-feed consumer registered by `subscribe`.
pub(crate) struct Subscriber {
    pub id: u64,
    pub collection: String,
    pub tx: Sender<ChangeBatch>,
    /// Last change sequence already delivered.
    pub cursor: i64,
    /// Documents the subscriber has seen, to tell `Added` from `Modified`.
    pub known: HashSet<String>,
}

/// How long a change row stays readable by feeds of other processes
/// sharing the same database file.
pub const CHANGE_RETENTION_SECS: i64 = 3600;

pub struct LocalBackend {
    pub pool: DbPool,
    pub(crate) min_password_length: usize,
    pub(crate) change_retention: Duration,
    pub(crate) subscribers: RefCell<Vec<Subscriber>>,
    pub(crate) next_subscriber: Cell<u64>,
}

impl LocalBackend {
    pub fn new(pool: DbPool, min_password_length: usize) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            min_password_length,
            change_retention: Duration::seconds(CHANGE_RETENTION_SECS),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(1),
        })
    }

    /// Open (and migrate) the database named in the configuration.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let path = expand_tilde(&cfg.database);
        let pool = DbPool::new(&path.to_string_lossy())?;
        Self::new(pool, cfg.min_password_length)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::new(DbPool::in_memory()?, crate::config::default_min_password_length())
    }

    pub fn with_change_retention(mut self, retention: Duration) -> Self {
        self.change_retention = retention;
        self
    }

    /// Store clock used for server timestamps.
    pub(crate) fn now_rfc3339() -> String {
        Self::rfc3339(Utc::now())
    }

    pub(crate) fn rfc3339(t: DateTime<Utc>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl OperationLog for LocalBackend {
    fn record(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            eprintln!("⚠️ Failed to write internal log: {}", e);
        }
    }
}

/// Random bytes, hex encoded.
pub(crate) fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
