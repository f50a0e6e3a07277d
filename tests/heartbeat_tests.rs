use rhours::core::heartbeat::Heartbeat;
use std::time::{Duration, Instant};

#[test]
fn test_heartbeat_schedule() {
    let mut hb = Heartbeat::new(Duration::from_secs(30));
    let t0 = Instant::now();

    assert!(!hb.is_active());
    assert!(!hb.due(t0));
    assert_eq!(hb.until_next(t0), None);
    assert_eq!(hb.interval(), Duration::from_secs(30));

    hb.start(t0);
    assert!(hb.due(t0));
    assert_eq!(hb.until_next(t0), Some(Duration::ZERO));

    hb.beat(t0);
    assert_eq!(hb.beats(), 1);
    assert!(!hb.due(t0 + Duration::from_secs(29)));
    assert_eq!(
        hb.until_next(t0 + Duration::from_secs(10)),
        Some(Duration::from_secs(20))
    );
    assert!(hb.due(t0 + Duration::from_secs(30)));

    // restarting replaces the running timer
    hb.start(t0 + Duration::from_secs(5));
    assert!(hb.due(t0 + Duration::from_secs(5)));
}

#[test]
fn test_heartbeat_cancel_is_idempotent() {
    let mut hb = Heartbeat::new(Duration::from_secs(30));
    let t0 = Instant::now();
    hb.start(t0);
    hb.beat(t0);

    assert!(hb.cancel());
    assert!(!hb.cancel());
    assert!(!hb.cancel());

    assert!(!hb.is_active());
    assert!(!hb.due(t0 + Duration::from_secs(3600)));
    assert_eq!(hb.until_next(t0), None);

    // beats after cancellation are ignored
    hb.beat(t0 + Duration::from_secs(60));
    assert_eq!(hb.beats(), 1);
    assert!(!hb.is_active());
}
