use crate::errors::AppResult;
use crate::remote::{Fields, server_timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `users/{uid}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip)]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub previous_hours: Option<f64>,
    /// Written only by operator tooling.
    #[serde(default)]
    pub admin: bool,
}

impl UserProfile {
    pub fn from_fields(uid: &str, fields: Fields) -> AppResult<Self> {
        let mut p: UserProfile = serde_json::from_value(Value::Object(fields))?;
        p.uid = uid.to_string();
        Ok(p)
    }

    /// Previous hours baseline, 0 when never entered.
    pub fn baseline(&self) -> f64 {
        self.previous_hours
            .filter(|h| h.is_finite() && *h >= 0.0)
            .unwrap_or(0.0)
    }
}

/// Merge patch for a profile. Has no `admin` field: the flag is never
/// client-writable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub email: Option<Option<String>>,
    pub previous_hours: Option<f64>,
    pub touch_last_seen: bool,
    pub set_created_at: bool,
}

impl ProfilePatch {
    /// Patch written on every sign-in.
    pub fn sign_in(email: Option<&str>, first_time: bool) -> Self {
        Self {
            email: Some(email.map(str::to_string)),
            previous_hours: None,
            touch_last_seen: true,
            set_created_at: first_time,
        }
    }

    pub fn previous_hours(hours: f64) -> Self {
        Self {
            previous_hours: Some(hours),
            ..Self::default()
        }
    }

    pub fn to_fields(&self) -> Fields {
        let mut f = Fields::new();

        if let Some(email) = &self.email {
            f.insert(
                "email".into(),
                email.clone().map(Value::String).unwrap_or(Value::Null),
            );
        }
        if self.touch_last_seen {
            f.insert("lastSeen".into(), server_timestamp());
        }
        if self.set_created_at {
            f.insert("createdAt".into(), server_timestamp());
        }
        if let Some(h) = self.previous_hours {
            f.insert("previousHours".into(), Value::from(h));
            f.insert("lastUpdated".into(), server_timestamp());
        }

        f
    }
}
