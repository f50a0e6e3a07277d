//! Reads and writes of the per-user records.

use crate::core::hours::HoursMap;
use crate::core::status::SyncStatus;
use crate::errors::AppResult;
use crate::models::hours_doc::HoursDocument;
use crate::models::presence::PresenceRecord;
use crate::models::profile::{ProfilePatch, UserProfile};
use crate::remote::{DocumentStore, Fields, Filter, OperationLog, SetOptions, paths, server_timestamp};
use serde_json::Value;

pub struct RemoteGateway<'a, S: DocumentStore + OperationLog + ?Sized> {
    store: &'a S,
    status: SyncStatus,
}

impl<'a, S: DocumentStore + OperationLog + ?Sized> RemoteGateway<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            status: SyncStatus::Idle,
        }
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn clear_status(&mut self) {
        self.status = SyncStatus::Idle;
    }

    /// Load the hours map of `uid`. Never fails: on any error the map is
    /// empty and the status stays `Failed` until the next success.
    pub fn load_hours(&mut self, uid: &str) -> HoursMap {
        self.try_load_hours(uid).unwrap_or_default()
    }

    /// Like `load_hours`, but the caller learns whether the stored map was
    /// actually read.
    pub fn try_load_hours(&mut self, uid: &str) -> AppResult<HoursMap> {
        self.status = SyncStatus::Loading;

        match self.fetch_hours(uid) {
            Ok(map) => {
                self.status = SyncStatus::Idle;
                Ok(map)
            }
            Err(e) => {
                self.store.record("load_hours", uid, &format!("failed: {}", e));
                self.status = SyncStatus::Failed(format!("Load failed: {}", e));
                Err(e)
            }
        }
    }

    fn fetch_hours(&self, uid: &str) -> AppResult<HoursMap> {
        let Some(fields) = self.store.get(&paths::user_hours(uid))? else {
            return Ok(HoursMap::new());
        };

        let doc: HoursDocument = serde_json::from_value(Value::Object(fields))?;
        let (map, skipped) = HoursMap::from_wire(&doc.hours_data);

        if !skipped.is_empty() {
            self.store.record(
                "load_hours",
                uid,
                &format!("skipped invalid entries: {}", skipped.join(", ")),
            );
        }

        Ok(map)
    }

    /// Write the whole hours document. The in-memory map is never rolled
    /// back; on success it is marked clean.
    pub fn save_hours(&mut self, uid: &str, hours: &mut HoursMap) -> AppResult<()> {
        self.status = SyncStatus::Saving;

        let mut fields = Fields::new();
        fields.insert("hoursData".into(), serde_json::to_value(hours.to_wire())?);
        fields.insert("updatedAt".into(), server_timestamp());

        match self.store.set(&paths::user_hours(uid), fields, SetOptions::replace()) {
            Ok(()) => {
                hours.mark_clean();
                self.status = SyncStatus::Saved;
                Ok(())
            }
            Err(e) => {
                self.store.record("save_hours", uid, &format!("failed: {}", e));
                self.status = SyncStatus::Failed(format!("Save failed: {}", e));
                Err(e)
            }
        }
    }

    pub fn load_profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        match self.store.get(&paths::user_profile(uid))? {
            Some(fields) => Ok(Some(UserProfile::from_fields(uid, fields)?)),
            None => Ok(None),
        }
    }

    /// Merge write: fields absent from the patch keep their stored value.
    pub fn upsert_profile(&self, uid: &str, patch: &ProfilePatch) -> AppResult<()> {
        self.store
            .set(&paths::user_profile(uid), patch.to_fields(), SetOptions::merge())
    }

    pub fn set_presence(&self, uid: &str, email: Option<&str>, online: bool) -> AppResult<()> {
        self.store.set(
            &paths::presence(uid),
            PresenceRecord::heartbeat_fields(email, online),
            SetOptions::merge(),
        )
    }

    pub fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        self.store
            .query(paths::USERS, &[])?
            .into_iter()
            .map(|d| UserProfile::from_fields(&d.id, d.fields))
            .collect()
    }

    pub fn list_presence(&self, online_only: bool) -> AppResult<Vec<PresenceRecord>> {
        let filters = if online_only {
            vec![Filter::eq("online", true)]
        } else {
            Vec::new()
        };

        self.store
            .query(paths::PRESENCE, &filters)?
            .into_iter()
            .map(|d| PresenceRecord::from_fields(&d.id, d.fields))
            .collect()
    }

    /// Remove hours, profile and presence of `uid`.
    pub fn delete_user_documents(&self, uid: &str) -> AppResult<()> {
        self.store.delete(&paths::user_hours(uid))?;
        self.store.delete(&paths::user_profile(uid))?;
        self.store.delete(&paths::presence(uid))?;
        Ok(())
    }
}
