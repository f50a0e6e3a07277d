// src/export/model.rs

use crate::core::hours::HoursMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat export document: `{ "hoursData": { "<YYYY-MM-DD>": <hours> } }`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoursExport {
    pub hours_data: BTreeMap<String, f64>,
}

impl From<&HoursMap> for HoursExport {
    fn from(map: &HoursMap) -> Self {
        Self {
            hours_data: map.to_wire(),
        }
    }
}
