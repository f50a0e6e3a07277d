mod common;
use common::{backend, date};
use rhours::config::Config;
use rhours::core::hours::{HoursMap, HoursPolicy};
use rhours::core::status::SyncStatus;
use rhours::db::LocalBackend;
use rhours::errors::{AppError, AppResult};
use rhours::remote::{
    Document, DocumentStore, Fields, Filter, OperationLog, RemoteGateway, SetOptions, Subscription,
    paths,
};
use serde_json::json;
use std::cell::Cell;

/// Store whose calls fail with a transport error while `offline` is set.
struct FlakyStore {
    inner: LocalBackend,
    offline: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: backend(),
            offline: Cell::new(false),
        }
    }

    fn reachable(&self) -> AppResult<()> {
        if self.offline.get() {
            return Err(AppError::Transport("connection lost".into()));
        }
        Ok(())
    }
}

impl DocumentStore for FlakyStore {
    fn get(&self, path: &str) -> AppResult<Option<Fields>> {
        self.reachable()?;
        self.inner.get(path)
    }

    fn set(&self, path: &str, fields: Fields, opts: SetOptions) -> AppResult<()> {
        self.reachable()?;
        self.inner.set(path, fields, opts)
    }

    fn delete(&self, path: &str) -> AppResult<()> {
        self.reachable()?;
        self.inner.delete(path)
    }

    fn query(&self, collection: &str, filters: &[Filter]) -> AppResult<Vec<Document>> {
        self.reachable()?;
        self.inner.query(collection, filters)
    }

    fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        self.reachable()?;
        self.inner.subscribe(collection)
    }

    fn deliver_pending(&self) -> AppResult<usize> {
        self.reachable()?;
        self.inner.deliver_pending()
    }
}

impl OperationLog for FlakyStore {
    fn record(&self, operation: &str, target: &str, message: &str) {
        self.inner.record(operation, target, message);
    }
}

fn policy() -> HoursPolicy {
    HoursPolicy::from_config(&Config::default())
}

#[test]
fn test_load_hours_is_fail_soft_and_failure_is_sticky() {
    let store = FlakyStore::new();
    store
        .inner
        .set(
            &paths::user_hours("u1"),
            json!({ "hoursData": { "2025-10-01": 8 } })
                .as_object()
                .unwrap()
                .clone(),
            SetOptions::replace(),
        )
        .unwrap();

    let mut gw = RemoteGateway::new(&store);
    store.offline.set(true);

    let map = gw.load_hours("u1");
    assert!(map.is_empty());
    assert!(matches!(gw.status(), SyncStatus::Failed(_)));

    // still failing: the indicator stays on the failure
    assert!(matches!(gw.try_load_hours("u1"), Err(AppError::Transport(_))));
    assert!(gw.status().is_failure());

    store.offline.set(false);
    let map = gw.load_hours("u1");
    assert_eq!(map.get(date(2025, 10, 1)), Some(8.0));
    assert_eq!(gw.status(), &SyncStatus::Idle);
}

#[test]
fn test_failed_save_keeps_the_edit_in_memory() {
    let store = FlakyStore::new();
    let mut gw = RemoteGateway::new(&store);

    let mut map = HoursMap::new();
    map.set_day_hours(date(2025, 10, 1), 8.0, &policy()).unwrap();

    store.offline.set(true);
    let err = gw.save_hours("u1", &mut map).unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(gw.status().is_failure());
    assert_eq!(map.get(date(2025, 10, 1)), Some(8.0));
    assert!(map.is_dirty());

    store.offline.set(false);
    assert!(store.inner.get(&paths::user_hours("u1")).unwrap().is_none());

    gw.save_hours("u1", &mut map).unwrap();
    assert_eq!(gw.status(), &SyncStatus::Saved);
    assert!(!map.is_dirty());
    let stored = store.inner.get(&paths::user_hours("u1")).unwrap().unwrap();
    assert_eq!(stored["hoursData"], json!({ "2025-10-01": 8.0 }));
}

#[test]
fn test_presence_and_profile_writes_report_transport_errors() {
    let store = FlakyStore::new();
    let gw = RemoteGateway::new(&store);
    store.offline.set(true);

    assert!(matches!(
        gw.set_presence("u1", Some("a@example.com"), true),
        Err(AppError::Transport(_))
    ));
    assert!(matches!(gw.load_profile("u1"), Err(AppError::Transport(_))));

    store.offline.set(false);
    assert!(gw.list_presence(false).unwrap().is_empty());
}
