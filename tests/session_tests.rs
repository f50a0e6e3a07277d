mod common;
use common::{PASSWORD, backend, date, settings, signed_in};
use rhours::core::hours::ResetConfirmed;
use rhours::core::projector::Projection;
use rhours::core::session::{SessionController, SessionState};
use rhours::core::status::SyncStatus;
use rhours::errors::AppError;
use rhours::db::LocalBackend;
use rhours::remote::{CredentialService, DocumentStore, RemoteGateway, SetOptions, paths};
use serde_json::json;
use std::time::{Duration, Instant};

#[test]
fn test_sign_in_writes_profile_presence_and_starts_heartbeat() {
    let b = backend();
    let ctrl = signed_in(&b, "a@example.com");
    let uid = ctrl.identity().unwrap().uid.clone();

    let gw = RemoteGateway::new(&b);
    let profile = gw.load_profile(&uid).unwrap().expect("profile created");
    assert_eq!(profile.email.as_deref(), Some("a@example.com"));
    assert!(profile.created_at.is_some());
    assert!(profile.last_seen.is_some());
    assert!(!profile.admin);

    let presence = gw.list_presence(true).unwrap();
    assert_eq!(presence.len(), 1);
    assert_eq!(presence[0].uid, uid);

    let hb = ctrl.heartbeat().expect("heartbeat");
    assert!(hb.is_active());
    assert_eq!(hb.beats(), 1);
    assert!(!ctrl.is_admin());
    assert!(ctrl.hours().unwrap().is_empty());
    assert_eq!(ctrl.previous_hours().unwrap(), 0.0);
}

#[test]
fn test_created_at_is_written_once() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    let uid = ctrl.identity().unwrap().uid.clone();
    let first = RemoteGateway::new(&b).load_profile(&uid).unwrap().unwrap();

    ctrl.sign_out().unwrap();
    ctrl.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();

    let second = RemoteGateway::new(&b).load_profile(&uid).unwrap().unwrap();
    assert_eq!(first.created_at, second.created_at);
}

#[test]
fn test_hours_survive_a_new_session() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");

    ctrl.set_day_hours(date(2025, 10, 1), 8.0).unwrap();
    ctrl.set_day_hours(date(2025, 10, 2), 0.0).unwrap();
    assert_eq!(ctrl.status(), &SyncStatus::Saved);
    assert!(!ctrl.hours().unwrap().is_dirty());

    let mut other = SessionController::new(&b, settings());
    other.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();
    let hours = other.hours().unwrap();
    assert_eq!(hours.get(date(2025, 10, 1)), Some(8.0));
    assert_eq!(hours.get(date(2025, 10, 2)), Some(0.0));
    assert_eq!(hours.total_hours(), 8.0);
}

#[test]
fn test_invalid_entry_changes_nothing() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");

    let err = ctrl.set_day_hours(date(2025, 10, 1), 9.0).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(ctrl.hours().unwrap().is_empty());

    let uid = ctrl.identity().unwrap().uid.clone();
    assert!(b.get(&paths::user_hours(&uid)).unwrap().is_none());
}

#[test]
fn test_reset_clears_stored_hours() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    ctrl.set_day_hours(date(2025, 10, 1), 8.0).unwrap();
    ctrl.set_day_hours(date(2025, 10, 3), 6.0).unwrap();

    ctrl.reset_all(ResetConfirmed::granted()).unwrap();
    assert!(ctrl.hours().unwrap().is_empty());

    let mut other = SessionController::new(&b, settings());
    other.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();
    assert!(other.hours().unwrap().is_empty());
}

#[test]
fn test_previous_hours_feed_the_summary() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    ctrl.set_day_hours(date(2025, 10, 1), 8.0).unwrap();

    assert!(ctrl.set_previous_hours(-1.0).is_err());
    assert!(ctrl.set_previous_hours(f64::NAN).is_err());
    ctrl.set_previous_hours(1784.0).unwrap();

    let s = ctrl.summary().unwrap();
    assert_eq!(s.in_system_hours, 8.0);
    assert_eq!(s.previous_hours, 1784.0);
    assert_eq!(s.total_hours, 1792.0);
    assert_eq!(s.recorded_days, 1);
    assert_eq!(
        s.projection,
        Projection::Forecast {
            date: date(2025, 10, 2),
            days_needed: 1
        }
    );

    // the baseline is loaded on the next sign-in
    ctrl.sign_out().unwrap();
    ctrl.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();
    assert_eq!(ctrl.previous_hours().unwrap(), 1784.0);

    ctrl.set_previous_hours(1792.0).unwrap();
    assert_eq!(ctrl.summary().unwrap().projection, Projection::Completed);
}

#[test]
fn test_sign_out_tears_everything_down() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    let id = ctrl.identity().unwrap().clone();
    ctrl.set_day_hours(date(2025, 10, 1), 8.0).unwrap();

    ctrl.sign_out().unwrap();

    assert!(matches!(ctrl.state(), SessionState::SignedOut));
    assert!(matches!(ctrl.hours(), Err(AppError::NotSignedIn)));
    assert!(ctrl.heartbeat().is_none());
    assert_eq!(ctrl.status(), &SyncStatus::Idle);
    assert!(b.restore(&id.token).unwrap().is_none());

    let presence = RemoteGateway::new(&b).list_presence(false).unwrap();
    assert_eq!(presence.len(), 1);
    assert!(!presence[0].online);

    // signing out twice is harmless
    ctrl.sign_out().unwrap();
}

#[test]
fn test_heartbeat_ticks_on_interval_only_while_signed_in() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    let t0 = Instant::now();

    assert!(!ctrl.tick(t0).unwrap().heartbeat_sent);
    assert!(ctrl.tick(t0 + Duration::from_secs(31)).unwrap().heartbeat_sent);
    assert!(!ctrl.tick(t0 + Duration::from_secs(40)).unwrap().heartbeat_sent);
    assert!(ctrl.tick(t0 + Duration::from_secs(62)).unwrap().heartbeat_sent);
    assert_eq!(ctrl.heartbeat().unwrap().beats(), 3);

    ctrl.sign_out().unwrap();
    let report = ctrl.tick(t0 + Duration::from_secs(120)).unwrap();
    assert!(!report.heartbeat_sent);

    // nothing turned the user back online
    let presence = RemoteGateway::new(&b).list_presence(true).unwrap();
    assert!(presence.is_empty());
}

#[test]
fn test_session_change_for_same_user_is_a_no_op() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    ctrl.set_day_hours(date(2025, 10, 1), 8.0).unwrap();
    let id = ctrl.identity().unwrap().clone();

    ctrl.on_session_change(Some(id), Instant::now()).unwrap();
    assert_eq!(ctrl.heartbeat().unwrap().beats(), 1);

    // switching user drops the previous user's hours
    b.create_account("b@example.com", PASSWORD).unwrap();
    let other = b.sign_in("b@example.com", PASSWORD).unwrap();
    ctrl.on_session_change(Some(other), Instant::now()).unwrap();
    assert_eq!(
        ctrl.identity().unwrap().email.as_deref(),
        Some("b@example.com")
    );
    assert!(ctrl.hours().unwrap().is_empty());

    ctrl.on_session_change(None, Instant::now()).unwrap();
    assert!(!ctrl.is_signed_in());
}

#[test]
fn test_resume_with_unknown_token() {
    let b = backend();
    let mut ctrl = SessionController::new(&b, settings());
    assert!(!ctrl.resume("deadbeef", Instant::now()).unwrap());
    assert!(!ctrl.is_signed_in());
}

#[test]
fn test_admin_actions_require_admin() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");

    assert!(matches!(ctrl.admin(), Err(AppError::Authorization(_))));
    assert!(matches!(
        ctrl.delete_account("someone"),
        Err(AppError::Authorization(_))
    ));
    assert!(matches!(
        ctrl.refresh_directory(),
        Err(AppError::Authorization(_))
    ));
}

/// Account with hours already stored before the first sign-in.
fn account_with_stored_hours(b: &LocalBackend, email: &str, stored: serde_json::Value) -> String {
    let uid = b.create_account(email, PASSWORD).unwrap();
    let serde_json::Value::Object(fields) = stored else {
        panic!("object expected");
    };
    b.set(&paths::user_hours(&uid), fields, SetOptions::replace())
        .unwrap();
    uid
}

#[test]
fn test_unreadable_stored_entries_are_skipped_not_fatal() {
    let b = backend();
    let uid = account_with_stored_hours(
        &b,
        "a@example.com",
        json!({ "hoursData": { "2025-10-01": 8, "2025-10-02": 7, "2025-10-03": null } }),
    );

    let mut ctrl = SessionController::new(&b, settings());
    ctrl.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();
    assert!(ctrl.hours_loaded());
    assert_eq!(ctrl.hours().unwrap().len(), 2);
    assert!(!ctrl.status().is_failure());

    ctrl.set_day_hours(date(2025, 10, 4), 5.0).unwrap();

    let stored = b.get(&paths::user_hours(&uid)).unwrap().unwrap();
    assert_eq!(
        stored["hoursData"],
        json!({ "2025-10-01": 8.0, "2025-10-02": 7.0, "2025-10-04": 5.0 })
    );

    let skipped: i64 = b
        .pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'load_hours' AND message LIKE 'skipped%'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(skipped, 1);
}

#[test]
fn test_failed_load_never_overwrites_stored_hours() {
    let b = backend();
    let uid = account_with_stored_hours(&b, "a@example.com", json!({ "hoursData": "garbage" }));
    let before = b.get(&paths::user_hours(&uid)).unwrap();

    let mut ctrl = SessionController::new(&b, settings());
    ctrl.sign_in("a@example.com", PASSWORD, Instant::now()).unwrap();
    assert!(!ctrl.hours_loaded());
    assert!(ctrl.hours().unwrap().is_empty());
    assert!(ctrl.status().is_failure());

    let err = ctrl.set_day_hours(date(2025, 10, 4), 5.0).unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(ctrl.reset_all(ResetConfirmed::granted()).is_err());
    assert!(ctrl.hours().unwrap().is_empty());
    assert_eq!(b.get(&paths::user_hours(&uid)).unwrap(), before);

    // once the stored map is readable again the edit goes through on top of it
    b.set(
        &paths::user_hours(&uid),
        json!({ "hoursData": { "2025-10-01": 8 } })
            .as_object()
            .unwrap()
            .clone(),
        SetOptions::replace(),
    )
    .unwrap();

    ctrl.set_day_hours(date(2025, 10, 2), 4.0).unwrap();
    assert!(ctrl.hours_loaded());
    assert_eq!(ctrl.hours().unwrap().len(), 2);
    assert_eq!(ctrl.status(), &SyncStatus::Saved);

    let stored = b.get(&paths::user_hours(&uid)).unwrap().unwrap();
    assert_eq!(stored["hoursData"], json!({ "2025-10-01": 8.0, "2025-10-02": 4.0 }));
}

#[test]
fn test_sign_out_cancels_the_heartbeat_once() {
    let b = backend();
    let mut ctrl = signed_in(&b, "a@example.com");
    let mut hb = ctrl.heartbeat().unwrap().clone();

    // the session's timer is running; cancelling a copy twice only stops it once
    assert!(hb.cancel());
    assert!(!hb.cancel());

    ctrl.sign_out().unwrap();
    assert!(ctrl.heartbeat().is_none());
    ctrl.sign_out().unwrap();
    assert!(ctrl.heartbeat().is_none());
}
