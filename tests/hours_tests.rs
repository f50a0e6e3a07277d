mod common;
use common::date;
use rhours::config::Config;
use rhours::core::calendar::{CalendarMonth, CellKind, MonthCursor};
use rhours::core::hours::{
    DayState, HoursMap, HoursPolicy, ResetConfirmed, canonical_key, parse_hours_input,
};
use rhours::errors::AppError;
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn policy() -> HoursPolicy {
    HoursPolicy::from_config(&Config::default())
}

#[test]
fn test_canonical_key_is_zero_padded_and_sorts_chronologically() {
    assert_eq!(canonical_key(date(2025, 10, 1)), "2025-10-01");
    assert_eq!(canonical_key(date(2026, 2, 9)), "2026-02-09");

    let mut keys = vec![
        canonical_key(date(2026, 1, 10)),
        canonical_key(date(2025, 12, 2)),
        canonical_key(date(2025, 10, 30)),
    ];
    keys.sort();
    assert_eq!(keys, vec!["2025-10-30", "2025-12-02", "2026-01-10"]);
}

#[test]
fn test_set_day_hours_reads_back_every_valid_value() {
    let p = policy();
    let mut map = HoursMap::new();
    let d = date(2025, 10, 6);

    for h in [0.0, 0.5, 1.0, 4.25, 7.5, 8.0] {
        map.set_day_hours(d, h, &p).expect("valid hours");
        assert_eq!(map.get(d), Some(h));
    }
}

#[test]
fn test_zero_is_absent_not_unrecorded() {
    let p = policy();
    let mut map = HoursMap::new();

    map.set_day_hours(date(2025, 10, 6), 0.0, &p).unwrap();

    assert_eq!(map.state(date(2025, 10, 6)), DayState::Absent);
    assert_eq!(map.state(date(2025, 10, 7)), DayState::Unrecorded);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_invalid_hours_are_rejected_without_mutation() {
    let p = policy();
    let mut map = HoursMap::new();
    let d = date(2025, 10, 6);
    map.set_day_hours(d, 3.0, &p).unwrap();
    map.mark_clean();

    for bad in [-0.5, 8.01, 24.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = map.set_day_hours(d, bad, &p).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{bad} accepted");
    }

    assert_eq!(map.get(d), Some(3.0));
    assert!(!map.is_dirty());
}

#[test]
fn test_dates_outside_range_or_on_sunday_are_rejected() {
    let p = policy();
    let mut map = HoursMap::new();

    // before min_date, after max_date, Sunday
    for d in [date(2025, 9, 30), date(2027, 1, 1), date(2025, 10, 5)] {
        assert!(matches!(
            map.set_day_hours(d, 4.0, &p),
            Err(AppError::Validation(_))
        ));
    }
    assert!(map.is_empty());

    // range bounds are inclusive
    map.set_day_hours(date(2025, 10, 1), 8.0, &p).unwrap();
    map.set_day_hours(date(2026, 12, 31), 8.0, &p).unwrap();
    assert_eq!(map.len(), 2);
}

#[test]
fn test_total_hours_counts_positive_entries_only() {
    let p = policy();
    let mut map = HoursMap::new();
    map.set_day_hours(date(2025, 10, 1), 8.0, &p).unwrap();
    map.set_day_hours(date(2025, 10, 2), 0.0, &p).unwrap();
    map.set_day_hours(date(2025, 10, 3), 6.5, &p).unwrap();

    assert_eq!(map.total_hours(), 14.5);
    assert_eq!(HoursMap::new().total_hours(), 0.0);
}

#[test]
fn test_clear_all_empties_the_map_and_marks_it_dirty() {
    let p = policy();
    let mut map = HoursMap::new();
    map.set_day_hours(date(2025, 10, 1), 8.0, &p).unwrap();
    map.mark_clean();

    map.clear_all(ResetConfirmed::granted());

    assert!(map.is_empty());
    assert!(map.is_dirty());
    assert_eq!(map.total_hours(), 0.0);
}

#[test]
fn test_parse_hours_input() {
    assert_eq!(parse_hours_input("").unwrap(), 0.0);
    assert_eq!(parse_hours_input("  ").unwrap(), 0.0);
    assert_eq!(parse_hours_input("absent").unwrap(), 0.0);
    assert_eq!(parse_hours_input("Absent").unwrap(), 0.0);
    assert_eq!(parse_hours_input("7.5").unwrap(), 7.5);
    assert!(parse_hours_input("seven").is_err());
}

#[test]
fn test_from_wire_skips_invalid_entries() {
    let wire: BTreeMap<String, Value> = serde_json::from_value(json!({
        "2025-10-01": 8,
        "2025-10-02": 0.0,
        "not-a-date": 5,
        "2025-10-03": -2.0,
        "2025-10-04": null,
        "2025-10-06": "seven"
    }))
    .unwrap();

    let (map, skipped) = HoursMap::from_wire(&wire);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(date(2025, 10, 1)), Some(8.0));
    assert_eq!(map.state(date(2025, 10, 2)), DayState::Absent);
    assert_eq!(
        skipped,
        vec!["2025-10-03", "2025-10-04", "2025-10-06", "not-a-date"]
    );
    assert_eq!(map.to_wire().len(), 2);
}

#[test]
fn test_from_wire_checked_rejects_the_whole_file() {
    let mut wire = BTreeMap::new();
    wire.insert("2025-10-01".to_string(), 8.0);
    wire.insert("2025-10-02".to_string(), -1.0);
    assert!(HoursMap::from_wire_checked(&wire).is_err());

    let mut wire = BTreeMap::new();
    wire.insert("2025-10-01".to_string(), 8.0);
    wire.insert("yesterday".to_string(), 4.0);
    assert!(matches!(
        HoursMap::from_wire_checked(&wire),
        Err(AppError::InvalidDate(_))
    ));
}

#[test]
fn test_from_wire_checked_accepts_whatever_was_stored() {
    // values recorded under an older configuration: above today's cap,
    // on a Sunday and before the current range
    let mut wire = BTreeMap::new();
    wire.insert("2025-10-01".to_string(), 10.0);
    wire.insert("2025-10-05".to_string(), 4.0);
    wire.insert("2024-12-31".to_string(), 2.0);

    let map = HoursMap::from_wire_checked(&wire).unwrap();
    assert_eq!(map.to_wire(), wire);
    assert!(!map.is_dirty());
}

#[test]
fn test_calendar_month_marks_cells() {
    let p = policy();
    let mut map = HoursMap::new();
    map.set_day_hours(date(2025, 10, 1), 8.0, &p).unwrap();
    map.set_day_hours(date(2025, 10, 2), 0.0, &p).unwrap();

    let grid = CalendarMonth::build(2025, 10, &map, &p).unwrap();

    assert_eq!(grid.title(), "October 2025");
    assert_eq!(grid.days.len(), 31);
    // October 1st 2025 is a Wednesday
    assert_eq!(grid.leading_blanks, 3);
    assert_eq!(grid.days[0].state, DayState::Worked(8.0));
    assert_eq!(grid.days[1].state, DayState::Absent);
    assert_eq!(grid.days[4].kind, CellKind::NonWorking);
    assert!(!grid.days[4].is_editable());
    assert_eq!(grid.month_total(), 8.0);

    // September 2025 is entirely before the tracked range
    let before = CalendarMonth::build(2025, 9, &map, &p).unwrap();
    assert!(before.days.iter().all(|c| c.kind == CellKind::OutOfRange));
}

#[test]
fn test_month_cursor_stays_inside_range() {
    let p = policy();

    let mut c = MonthCursor::new(2025, 10, &p).unwrap();
    assert!(!c.can_go_back());
    assert!(!c.prev());
    assert!(c.next());
    assert_eq!((c.year, c.month), (2025, 11));

    let mut last = MonthCursor::new(2026, 12, &p).unwrap();
    assert!(!last.next());
    assert!(last.prev());
    assert_eq!((last.year, last.month), (2026, 11));

    assert!(MonthCursor::new(2027, 1, &p).is_err());
    let clamped = MonthCursor::clamped(date(2030, 5, 5), &p);
    assert_eq!((clamped.year, clamped.month), (2026, 12));
}
