//! Document store on SQLite with a change log feeding live subscriptions.

use crate::db::backend::{LocalBackend, Subscriber};
use crate::errors::AppResult;
use crate::remote::{
    ChangeBatch, ChangeKind, DocChange, Document, DocumentStore, Fields, Filter, SetOptions,
    Subscription, is_server_timestamp, paths,
};
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::mpsc;

/// Replace server-timestamp sentinels with the store clock.
fn resolve_timestamps(fields: &mut Fields, now: &str) {
    for v in fields.values_mut() {
        if is_server_timestamp(v) {
            *v = Value::String(now.to_string());
        }
    }
}

impl LocalBackend {
    fn log_change(&self, collection: &str, doc_id: &str, kind: &str, at: &str) -> AppResult<()> {
        self.pool.conn.execute(
            "INSERT INTO changes (collection, doc_id, kind, at) VALUES (?1, ?2, ?3, ?4)",
            params![collection, doc_id, kind, at],
        )?;
        Ok(())
    }

    fn last_change_seq(&self) -> AppResult<i64> {
        let seq: i64 = self
            .pool
            .conn
            .query_row("SELECT IFNULL(MAX(seq), 0) FROM changes", [], |r| r.get(0))?;
        Ok(seq)
    }

    /// Changed doc ids of a collection after `cursor`, each once, in the
    /// order of their last change. Also returns the new cursor, which is
    /// the head of the change log whatever the collection.
    fn changes_since(&self, collection: &str, cursor: i64) -> AppResult<(Vec<String>, i64)> {
        let head = self.last_change_seq()?;

        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT doc_id FROM changes
             WHERE collection = ?1 AND seq > ?2 AND seq <= ?3
             ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![collection, cursor, head], |r| r.get::<_, String>(0))?;

        let mut ids: Vec<String> = Vec::new();
        for r in rows {
            let id = r?;
            ids.retain(|x| x != &id);
            ids.push(id);
        }

        Ok((ids, head.max(cursor)))
    }

    /// Drop change rows every local subscriber has seen once they are older
    /// than the retention window. The newest row is always kept.
    fn prune_changes(&self, oldest_cursor: Option<i64>) -> AppResult<usize> {
        let keep_from = match oldest_cursor {
            Some(c) => c,
            None => self.last_change_seq()?,
        };
        let cutoff = Self::rfc3339(Utc::now() - self.change_retention);

        let pruned = self.pool.conn.execute(
            "DELETE FROM changes WHERE seq < ?1 AND at <= ?2",
            params![keep_from, cutoff],
        )?;
        Ok(pruned)
    }

    fn parse_fields(raw: &str) -> AppResult<Fields> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(m) => Ok(m),
            _ => Ok(Fields::new()),
        }
    }

    /// Build the next batch for one subscriber, `None` when nothing changed.
    fn batch_for(&self, sub: &mut Subscriber) -> AppResult<Option<ChangeBatch>> {
        let (ids, cursor) = self.changes_since(&sub.collection, sub.cursor)?;
        sub.cursor = cursor;

        let mut batch = ChangeBatch::default();
        for id in ids {
            let path = format!("{}/{}", sub.collection, id);
            match self.get(&path)? {
                Some(fields) => {
                    let kind = if sub.known.insert(id.clone()) {
                        ChangeKind::Added
                    } else {
                        ChangeKind::Modified
                    };
                    batch.changes.push(DocChange {
                        kind,
                        id,
                        fields: Some(fields),
                    });
                }
                None => {
                    if sub.known.remove(&id) {
                        batch.changes.push(DocChange {
                            kind: ChangeKind::Removed,
                            id,
                            fields: None,
                        });
                    }
                }
            }
        }

        Ok((!batch.is_empty()).then_some(batch))
    }
}

impl DocumentStore for LocalBackend {
    fn get(&self, path: &str) -> AppResult<Option<Fields>> {
        paths::split(path)?;

        let raw: Option<String> = self
            .pool
            .conn
            .query_row("SELECT fields FROM documents WHERE path = ?1", [path], |r| r.get(0))
            .optional()?;

        raw.map(|r| Self::parse_fields(&r)).transpose()
    }

    fn set(&self, path: &str, mut fields: Fields, opts: SetOptions) -> AppResult<()> {
        let (collection, doc_id) = paths::split(path)?;
        let now = Self::now_rfc3339();
        resolve_timestamps(&mut fields, &now);

        let merged = match (opts.merge, self.get(path)?) {
            (true, Some(mut existing)) => {
                for (k, v) in fields {
                    existing.insert(k, v);
                }
                existing
            }
            _ => fields,
        };

        let tx = self.pool.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO documents (path, collection, doc_id, fields, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(path) DO UPDATE SET fields = excluded.fields, updated_at = excluded.updated_at",
            params![path, collection, doc_id, Value::Object(merged).to_string(), now],
        )?;
        self.log_change(collection, doc_id, "set", &now)?;
        tx.commit()?;

        self.deliver_pending()?;
        Ok(())
    }

    fn delete(&self, path: &str) -> AppResult<()> {
        let (collection, doc_id) = paths::split(path)?;
        let now = Self::now_rfc3339();

        let tx = self.pool.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM documents WHERE path = ?1", [path])?;
        if removed > 0 {
            self.log_change(collection, doc_id, "delete", &now)?;
        }
        tx.commit()?;

        if removed > 0 {
            self.deliver_pending()?;
        }
        Ok(())
    }

    fn query(&self, collection: &str, filters: &[Filter]) -> AppResult<Vec<Document>> {
        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT doc_id, fields FROM documents WHERE collection = ?1 ORDER BY doc_id ASC",
        )?;
        let rows = stmt.query_map([collection], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (id, raw) = r?;
            let fields = Self::parse_fields(&raw)?;
            if filters.iter().all(|f| f.matches(&fields)) {
                out.push(Document { id, fields });
            }
        }

        Ok(out)
    }

    fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        let (tx, rx) = mpsc::channel();
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);

        let cursor = self.last_change_seq()?;
        let docs = self.query(collection, &[])?;

        let known: HashSet<String> = docs.iter().map(|d| d.id.clone()).collect();
        let initial = ChangeBatch {
            changes: docs
                .into_iter()
                .map(|d| DocChange {
                    kind: ChangeKind::Added,
                    id: d.id,
                    fields: Some(d.fields),
                })
                .collect(),
        };
        // the receiver is alive, this cannot fail
        let _ = tx.send(initial);

        self.subscribers.borrow_mut().push(Subscriber {
            id,
            collection: collection.to_string(),
            tx,
            cursor,
            known,
        });

        Ok(Subscription::new(id, rx))
    }

    fn deliver_pending(&self) -> AppResult<usize> {
        let mut subs = std::mem::take(&mut *self.subscribers.borrow_mut());
        let mut delivered = 0;
        let mut result = Ok(());

        subs.retain_mut(|sub| {
            if result.is_err() {
                return true;
            }
            match self.batch_for(sub) {
                Ok(Some(batch)) => {
                    if sub.tx.send(batch).is_err() {
                        // receiver cancelled
                        return false;
                    }
                    delivered += 1;
                    true
                }
                Ok(None) => true,
                Err(e) => {
                    result = Err(e);
                    true
                }
            }
        });

        // subscriptions opened while delivering are kept as well
        let mut current = self.subscribers.borrow_mut();
        subs.append(&mut current);
        let oldest_cursor = subs.iter().map(|s| s.cursor).min();
        *current = subs;
        drop(current);

        result?;
        self.prune_changes(oldest_cursor)?;
        Ok(delivered)
    }
}

impl LocalBackend {
    /// Live subscriber ids, used by tests to check cancellation.
    pub fn live_subscribers(&self) -> Vec<u64> {
        self.subscribers.borrow().iter().map(|s| s.id).collect()
    }
}
