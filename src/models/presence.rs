use crate::errors::AppResult;
use crate::remote::{Fields, server_timestamp};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `presence/{uid}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    #[serde(skip)]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub last_seen: Option<String>,
}

impl PresenceRecord {
    pub fn from_fields(uid: &str, fields: Fields) -> AppResult<Self> {
        let mut p: PresenceRecord = serde_json::from_value(Value::Object(fields))?;
        p.uid = uid.to_string();
        Ok(p)
    }

    /// Fields for a merge write of the online flag plus a server timestamp.
    pub fn heartbeat_fields(email: Option<&str>, online: bool) -> Fields {
        let mut f = Fields::new();
        f.insert(
            "email".into(),
            email.map(|e| Value::String(e.to_string())).unwrap_or(Value::Null),
        );
        f.insert("online".into(), Value::Bool(online));
        f.insert("lastSeen".into(), server_timestamp());
        f
    }

    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        self.last_seen
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

/// True when an `online` record has not been refreshed within `threshold`.
/// Only used for display; the stored flag is never rewritten.
pub fn is_stale(last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>, threshold: Duration) -> bool {
    match last_seen {
        Some(seen) => now.signed_duration_since(seen) > threshold,
        None => true,
    }
}
