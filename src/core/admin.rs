//! Administrator view over all users and their presence.

use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use crate::models::presence::{PresenceRecord, is_stale};
use crate::remote::{
    Backend, ChangeBatch, ChangeKind, DocumentStore, OperationLog, RemoteGateway, Subscription, paths,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub uid: String,
    pub email: Option<String>,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceLabel {
    Online,
    /// Stored as online but not refreshed recently.
    Stale,
    Offline,
}

impl DirectoryEntry {
    pub fn presence_label(&self, now: DateTime<Utc>, stale_after: Duration) -> PresenceLabel {
        if !self.online {
            PresenceLabel::Offline
        } else if is_stale(self.last_seen, now, stale_after) {
            PresenceLabel::Stale
        } else {
            PresenceLabel::Online
        }
    }

    fn apply_presence(&mut self, p: &PresenceRecord) {
        self.online = p.online;
        self.last_seen = p.last_seen_at();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCounts {
    pub total: usize,
    pub online: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed(DirectoryCounts),
    /// Another refresh was still in flight.
    Skipped,
}

#[derive(Debug, Default)]
pub struct AdminDirectory {
    entries: Vec<DirectoryEntry>,
    feed: Option<Subscription>,
    refreshing: bool,
}

impl AdminDirectory {
    /// Load the directory and open the live presence feed.
    pub fn activate<S: DocumentStore + OperationLog + ?Sized>(store: &S) -> AppResult<Self> {
        let mut dir = AdminDirectory {
            feed: Some(store.subscribe(paths::PRESENCE)?),
            ..Default::default()
        };
        dir.entries = Self::list_users(store, false)?;
        // the initial snapshot is already reflected in the listing
        if let Some(feed) = dir.feed.as_mut() {
            feed.drain();
        }
        Ok(dir)
    }

    /// Join profiles with presence by uid. Users without a presence record
    /// are offline. With `online_only` only online users are returned.
    pub fn list_users<S: DocumentStore + OperationLog + ?Sized>(
        store: &S,
        online_only: bool,
    ) -> AppResult<Vec<DirectoryEntry>> {
        let gw = RemoteGateway::new(store);

        let presence: HashMap<String, PresenceRecord> = gw
            .list_presence(online_only)?
            .into_iter()
            .map(|p| (p.uid.clone(), p))
            .collect();

        let mut out = Vec::new();
        for profile in gw.list_profiles()? {
            let p = presence.get(&profile.uid);
            if online_only && p.is_none() {
                continue;
            }
            out.push(DirectoryEntry {
                online: p.map(|p| p.online).unwrap_or(false),
                last_seen: p.and_then(|p| p.last_seen_at()),
                uid: profile.uid,
                email: profile.email,
            });
        }

        Ok(out)
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn counts(&self) -> DirectoryCounts {
        DirectoryCounts {
            total: self.entries.len(),
            online: self.entries.iter().filter(|e| e.online).count(),
        }
    }

    /// Mark a refresh as in flight. False when one already is.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Settle an in-flight refresh with its result.
    pub fn complete_refresh(&mut self, result: AppResult<Vec<DirectoryEntry>>) -> AppResult<DirectoryCounts> {
        self.refreshing = false;
        self.entries = result?;
        Ok(self.counts())
    }

    pub fn refresh<S: DocumentStore + OperationLog + ?Sized>(&mut self, store: &S) -> AppResult<RefreshOutcome> {
        if !self.begin_refresh() {
            return Ok(RefreshOutcome::Skipped);
        }
        let listed = Self::list_users(store, false);
        self.complete_refresh(listed).map(RefreshOutcome::Refreshed)
    }

    /// Apply a presence change batch to the loaded users. Unknown uids are
    /// ignored. Returns how many entries changed.
    pub fn apply_batch(&mut self, batch: &ChangeBatch) -> usize {
        let mut changed = 0;

        for change in &batch.changes {
            let Some(entry) = self.entries.iter_mut().find(|e| e.uid == change.id) else {
                continue;
            };

            match (change.kind, &change.fields) {
                (ChangeKind::Removed, _) | (_, None) => {
                    entry.online = false;
                }
                (_, Some(fields)) => match PresenceRecord::from_fields(&change.id, fields.clone()) {
                    Ok(p) => entry.apply_presence(&p),
                    Err(_) => continue,
                },
            }
            changed += 1;
        }

        changed
    }

    /// Drain the live feed into the directory.
    pub fn pump(&mut self) -> usize {
        let Some(feed) = self.feed.as_mut() else {
            return 0;
        };

        let batches = feed.drain();
        batches.iter().map(|b| self.apply_batch(b)).sum()
    }

    pub fn is_live(&self) -> bool {
        self.feed.as_ref().is_some_and(Subscription::is_active)
    }

    /// Cancel the live feed. Safe to call more than once.
    pub fn deactivate(&mut self) -> bool {
        match self.feed.take() {
            Some(mut feed) => feed.cancel(),
            None => false,
        }
    }

    /// Delete an account. The credential goes first; a failure there
    /// aborts before any document is touched.
    pub fn delete_account<B: Backend + ?Sized>(&mut self, backend: &B, caller: &Identity, uid: &str) -> AppResult<()> {
        if caller.uid == uid {
            return Err(AppError::validation("You cannot delete your own account."));
        }

        backend.delete_credential(caller, uid)?;

        let gw = RemoteGateway::new(backend);
        if let Err(e) = gw.delete_user_documents(uid) {
            backend.record("delete_account", uid, &format!("documents left behind: {}", e));
            return Err(AppError::Transport(format!(
                "credential removed but user data could not be deleted: {}",
                e
            )));
        }

        self.entries.retain(|e| e.uid != uid);
        backend.record("delete_account", uid, "account deleted");
        Ok(())
    }
}
