use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `users/{uid}/data/hours`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursDocument {
    /// Raw values: entries that are not numbers are skipped on load
    /// instead of failing the whole document.
    #[serde(default)]
    pub hours_data: BTreeMap<String, Value>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
