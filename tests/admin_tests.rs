mod common;
use chrono::{Duration as ChronoDuration, Utc};
use common::{PASSWORD, backend, date, settings, signed_in};
use rhours::core::admin::{AdminDirectory, DirectoryEntry, PresenceLabel, RefreshOutcome};
use rhours::core::session::SessionController;
use rhours::db::LocalBackend;
use rhours::db::claims::set_admin_claim;
use rhours::errors::{AppError, auth_codes};
use rhours::remote::{CredentialService, DocumentStore, PrivilegedFunctions, paths};
use std::time::Instant;

/// Register an account, grant it the admin claim and sign in.
fn admin_session(b: &LocalBackend) -> SessionController<'_, LocalBackend> {
    let uid = b.create_account("admin@example.com", PASSWORD).unwrap();
    set_admin_claim(b, &uid, true).unwrap();

    let mut ctrl = SessionController::new(b, settings());
    ctrl.sign_in("admin@example.com", PASSWORD, Instant::now())
        .unwrap();
    assert!(ctrl.is_admin());
    ctrl
}

#[test]
fn test_counts_join_profiles_with_presence() {
    let b = backend();
    let _u1 = signed_in(&b, "one@example.com");
    let mut u2 = signed_in(&b, "two@example.com");
    u2.sign_out().unwrap();
    // a profile without any presence record counts as offline
    b.set(
        &paths::user_profile("legacy"),
        serde_json::from_str(r#"{"email":"legacy@example.com"}"#).unwrap(),
        rhours::remote::SetOptions::merge(),
    )
    .unwrap();

    let admin = admin_session(&b);
    let dir = admin.admin().unwrap();
    let counts = dir.counts();
    assert_eq!(counts.total, 4);
    // one@ and the admin itself
    assert_eq!(counts.online, 2);

    let online = AdminDirectory::list_users(&b, true).unwrap();
    assert_eq!(online.len(), 2);
    assert!(online.iter().all(|e| e.online));
}

#[test]
fn test_live_presence_updates_the_directory() {
    let b = backend();
    let mut admin = admin_session(&b);
    let mut user = signed_in(&b, "one@example.com");
    let uid = user.identity().unwrap().uid.clone();

    // not in the loaded directory yet: ignored until refresh
    admin.tick(Instant::now()).unwrap();
    assert!(admin.admin().unwrap().entries().iter().all(|e| e.uid != uid));

    assert_eq!(
        admin.refresh_directory().unwrap(),
        RefreshOutcome::Refreshed(admin.admin().unwrap().counts())
    );
    assert_eq!(admin.admin().unwrap().counts().online, 2);

    user.sign_out().unwrap();
    let report = admin.tick(Instant::now()).unwrap();
    assert_eq!(report.presence_updates, 1);

    let entry = admin
        .admin()
        .unwrap()
        .entries()
        .iter()
        .find(|e| e.uid == uid)
        .cloned()
        .unwrap();
    assert!(!entry.online);
    assert_eq!(admin.admin().unwrap().counts().online, 1);
}

#[test]
fn test_sign_out_cancels_the_presence_feed() {
    let b = backend();
    let mut admin = admin_session(&b);
    assert!(admin.admin().unwrap().is_live());
    assert_eq!(b.live_subscribers().len(), 1);

    admin.sign_out().unwrap();
    assert!(!admin.is_admin());
    // the store forgets the feed on its next delivery
    let _u = signed_in(&b, "one@example.com");
    assert!(b.live_subscribers().is_empty());
}

#[test]
fn test_refresh_is_gated() {
    let b = backend();
    let mut dir = AdminDirectory::default();

    assert!(dir.begin_refresh());
    assert!(!dir.begin_refresh());
    assert!(dir.is_refreshing());
    assert_eq!(dir.refresh(&b).unwrap(), RefreshOutcome::Skipped);

    dir.complete_refresh(Ok(Vec::new())).unwrap();
    assert!(!dir.is_refreshing());
    assert!(matches!(dir.refresh(&b).unwrap(), RefreshOutcome::Refreshed(_)));

    // a failed refresh releases the gate too
    assert!(dir.begin_refresh());
    assert!(dir
        .complete_refresh(Err(AppError::Transport("offline".into())))
        .is_err());
    assert!(!dir.is_refreshing());
}

#[test]
fn test_delete_account_removes_credential_and_data() {
    let b = backend();
    let mut user = signed_in(&b, "one@example.com");
    user.set_day_hours(date(2025, 10, 1), 8.0).unwrap();
    let uid = user.identity().unwrap().uid.clone();
    let token = user.identity().unwrap().token.clone();

    let mut admin = admin_session(&b);
    admin.delete_account(&uid).unwrap();

    assert!(!b.account_exists(&uid).unwrap());
    assert!(b.restore(&token).unwrap().is_none());
    assert!(b.get(&paths::user_hours(&uid)).unwrap().is_none());
    assert!(b.get(&paths::user_profile(&uid)).unwrap().is_none());
    assert!(b.get(&paths::presence(&uid)).unwrap().is_none());
    assert!(admin.admin().unwrap().entries().iter().all(|e| e.uid != uid));

    let e = b.sign_in("one@example.com", PASSWORD).unwrap_err();
    assert!(matches!(e, AppError::Auth { .. }));
}

#[test]
fn test_leftover_documents_can_still_be_deleted() {
    let b = backend();
    let mut admin = admin_session(&b);
    // documents without a credential behind them
    b.set(
        &paths::user_profile("ghost"),
        serde_json::from_str(r#"{"email":"ghost@example.com"}"#).unwrap(),
        rhours::remote::SetOptions::merge(),
    )
    .unwrap();
    b.set(
        &paths::presence("ghost"),
        serde_json::from_str(r#"{"online":false}"#).unwrap(),
        rhours::remote::SetOptions::merge(),
    )
    .unwrap();

    admin.delete_account("ghost").unwrap();
    assert!(b.get(&paths::user_profile("ghost")).unwrap().is_none());
    assert!(b.get(&paths::presence("ghost")).unwrap().is_none());
}

#[test]
fn test_deletion_can_be_retried_after_the_credential_is_gone() {
    let b = backend();
    let mut admin = admin_session(&b);
    let mut user = signed_in(&b, "user@example.com");
    let uid = user.identity().unwrap().uid.clone();
    user.set_day_hours(date(2025, 10, 1), 8.0).unwrap();
    user.sign_out().unwrap();

    // an earlier attempt removed the credential only
    b.pool
        .conn
        .execute("DELETE FROM accounts WHERE uid = ?1", [&uid])
        .unwrap();
    assert!(b.get(&paths::user_hours(&uid)).unwrap().is_some());

    admin.delete_account(&uid).unwrap();
    assert!(b.get(&paths::user_hours(&uid)).unwrap().is_none());
    assert!(b.get(&paths::user_profile(&uid)).unwrap().is_none());
}

#[test]
fn test_deleting_an_unknown_user_fails() {
    let b = backend();
    let mut admin = admin_session(&b);

    let e = admin.delete_account("nobody").unwrap_err();
    assert!(matches!(e, AppError::Auth { ref code } if code == auth_codes::USER_NOT_FOUND));
}

#[test]
fn test_admin_cannot_delete_itself() {
    let b = backend();
    let mut admin = admin_session(&b);
    let me = admin.identity().unwrap().uid.clone();

    assert!(matches!(
        admin.delete_account(&me),
        Err(AppError::Validation(_))
    ));
    assert!(b.account_exists(&me).unwrap());
}

#[test]
fn test_privileged_function_checks_the_caller_itself() {
    let b = backend();
    let user = signed_in(&b, "one@example.com");
    let victim = signed_in(&b, "two@example.com");
    let victim_uid = victim.identity().unwrap().uid.clone();

    // a non-admin caller is refused whatever the client believes
    let e = b
        .delete_credential(user.identity().unwrap(), &victim_uid)
        .unwrap_err();
    assert!(matches!(e, AppError::Authorization(_)));
    assert!(b.account_exists(&victim_uid).unwrap());

    // revoked admins are refused too
    let admin = admin_session(&b);
    let admin_uid = admin.identity().unwrap().uid.clone();
    set_admin_claim(&b, &admin_uid, false).unwrap();
    let e = b
        .delete_credential(admin.identity().unwrap(), &victim_uid)
        .unwrap_err();
    assert!(matches!(e, AppError::Authorization(_)));
}

#[test]
fn test_stale_presence_is_a_display_label() {
    let now = Utc::now();
    let stale_after = ChronoDuration::seconds(120);

    let mut e = DirectoryEntry {
        uid: "u".into(),
        email: None,
        online: true,
        last_seen: Some(now - ChronoDuration::seconds(30)),
    };
    assert_eq!(e.presence_label(now, stale_after), PresenceLabel::Online);

    e.last_seen = Some(now - ChronoDuration::seconds(600));
    assert_eq!(e.presence_label(now, stale_after), PresenceLabel::Stale);

    e.online = false;
    assert_eq!(e.presence_label(now, stale_after), PresenceLabel::Offline);

}
