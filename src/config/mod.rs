use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

/// One day.
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 86_400;
/// Thirty days.
pub const MAX_PRESENCE_STALE_SECS: i64 = 2_592_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_goal_hours")]
    pub goal_hours: f64,
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: f64,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_min_date")]
    pub min_date: NaiveDate,
    #[serde(default = "default_max_date")]
    pub max_date: NaiveDate,
    #[serde(default = "default_non_working_day")]
    pub non_working_day: Weekday,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_presence_stale")]
    pub presence_stale_secs: i64,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

pub(crate) fn default_goal_hours() -> f64 {
    1800.0
}
pub(crate) fn default_max_hours_per_day() -> f64 {
    8.0
}
pub(crate) fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default()
}
pub(crate) fn default_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default()
}
pub(crate) fn default_max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default()
}
pub(crate) fn default_non_working_day() -> Weekday {
    Weekday::Sun
}
pub(crate) fn default_heartbeat_interval() -> u64 {
    30
}
pub(crate) fn default_presence_stale() -> i64 {
    120
}
pub(crate) fn default_min_password_length() -> usize {
    6
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            goal_hours: default_goal_hours(),
            max_hours_per_day: default_max_hours_per_day(),
            start_date: default_start_date(),
            min_date: default_min_date(),
            max_date: default_max_date(),
            non_working_day: default_non_working_day(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            presence_stale_secs: default_presence_stale(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rhours")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rhours")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rhours.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rhours.sqlite")
    }

    /// Database path given on the command line: `~` is expanded and
    /// relative names live in the config directory.
    pub fn resolve_database(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// The persisted session token lives next to the database, so
    /// every `--db` gets its own signed-in user.
    pub fn session_file(&self) -> PathBuf {
        let db = expand_tilde(&self.database);
        let mut name = db
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "rhours.sqlite".to_string());
        name.push_str(".session");
        db.with_file_name(name)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Config::default()
        };

        Ok(cfg)
    }

    /// Reject settings the projector and the hours model cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if !(self.max_hours_per_day.is_finite() && self.max_hours_per_day > 0.0) {
            return Err(AppError::Config(
                "max_hours_per_day must be a positive number".into(),
            ));
        }
        if !(self.goal_hours.is_finite() && self.goal_hours > 0.0) {
            return Err(AppError::Config("goal_hours must be a positive number".into()));
        }
        if self.min_date > self.max_date {
            return Err(AppError::Config(format!(
                "min_date {} is after max_date {}",
                self.min_date, self.max_date
            )));
        }
        if !(1..=MAX_HEARTBEAT_INTERVAL_SECS).contains(&self.heartbeat_interval_secs) {
            return Err(AppError::Config(format!(
                "heartbeat_interval_secs must be between 1 and {}",
                MAX_HEARTBEAT_INTERVAL_SECS
            )));
        }
        if !(1..=MAX_PRESENCE_STALE_SECS).contains(&self.presence_stale_secs) {
            return Err(AppError::Config(format!(
                "presence_stale_secs must be between 1 and {}",
                MAX_PRESENCE_STALE_SECS
            )));
        }
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => Self::resolve_database(&name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", db_path.display(), e))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
