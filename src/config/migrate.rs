use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
const EXPECTED_KEYS: &[&str] = &[
    "database",
    "goal_hours",
    "max_hours_per_day",
    "start_date",
    "min_date",
    "max_date",
    "non_working_day",
    "heartbeat_interval_secs",
    "presence_stale_secs",
    "min_password_length",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

    match yaml {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{}: top level must be a mapping",
            path.display()
        ))),
    }
}

/// Return the expected keys that are missing from the config file.
pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;

    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect())
}

/// Add every missing key with its default value, keeping existing values.
///   Returns:
///   Ok(true)  → config updated
///   Ok(false) → no change needed
pub fn migrate_config_file(path: &Path) -> AppResult<bool> {
    let missing = missing_fields(path)?;
    if missing.is_empty() {
        info("Configuration file is up to date.");
        return Ok(false);
    }

    let mut map = read_mapping(path)?;

    let defaults = serde_yaml::to_value(Config::default()).map_err(|_| AppError::ConfigSave)?;
    let Value::Mapping(defaults) = defaults else {
        return Err(AppError::ConfigSave);
    };

    for key in &missing {
        if let Some(v) = defaults.get(*key) {
            map.insert(Value::String((*key).to_string()), v.clone());
        }
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(map)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, yaml).map_err(|_| AppError::ConfigSave)?;

    success(format!(
        "Configuration migrated, added: {}",
        missing.join(", ")
    ));
    Ok(true)
}
