//! Per-day hours model.
//!
//! Hours are kept per calendar day. A value of `0` marks the day as absent,
//! which is not the same as a day that was never recorded.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::format_hours;
use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stable map key for a date: zero-padded `YYYY-MM-DD`.
/// Lexicographic order of keys equals chronological order.
pub fn canonical_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Limits applied to every entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursPolicy {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub max_per_day: f64,
    pub non_working_day: Weekday,
}

impl HoursPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            min_date: cfg.min_date,
            max_date: cfg.max_date,
            max_per_day: cfg.max_hours_per_day,
            non_working_day: cfg.non_working_day,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min_date && date <= self.max_date
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        date.weekday() != self.non_working_day
    }

    pub fn validate_hours(&self, value: f64) -> AppResult<()> {
        if !value.is_finite() || value < 0.0 || value > self.max_per_day {
            return Err(AppError::validation(format!(
                "Please enter a number between 0 and {}.",
                format_hours(self.max_per_day)
            )));
        }
        Ok(())
    }

    pub fn validate_date(&self, date: NaiveDate) -> AppResult<()> {
        if !self.contains(date) {
            return Err(AppError::validation(format!(
                "{} is outside the tracked range {} .. {}.",
                canonical_key(date),
                canonical_key(self.min_date),
                canonical_key(self.max_date)
            )));
        }
        if !self.is_working_day(date) {
            return Err(AppError::validation(format!(
                "{} is a {}, hours cannot be entered on that day.",
                canonical_key(date),
                date.weekday()
            )));
        }
        Ok(())
    }
}

/// What is known about a single day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayState {
    Unrecorded,
    Absent,
    Worked(f64),
}

/// Proof that the user confirmed an irreversible reset.
#[derive(Debug)]
pub struct ResetConfirmed {
    _private: (),
}

impl ResetConfirmed {
    /// Only call after an explicit yes from the user (prompt or `--yes`).
    pub fn granted() -> Self {
        Self { _private: () }
    }
}

/// Parse the text typed for a day. Empty input and `absent` mean 0.
pub fn parse_hours_input(input: &str) -> AppResult<f64> {
    let t = input.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("absent") {
        return Ok(0.0);
    }

    t.parse::<f64>()
        .map_err(|_| AppError::validation(format!("'{}' is not a number of hours.", t)))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursMap {
    entries: BTreeMap<NaiveDate, f64>,
    dirty: bool,
}

impl HoursMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries.get(&date).copied()
    }

    pub fn state(&self, date: NaiveDate) -> DayState {
        match self.entries.get(&date) {
            None => DayState::Unrecorded,
            Some(h) if *h == 0.0 => DayState::Absent,
            Some(h) => DayState::Worked(*h),
        }
    }

    /// Record the hours of one day. Nothing changes when validation fails.
    pub fn set_day_hours(&mut self, date: NaiveDate, value: f64, policy: &HoursPolicy) -> AppResult<()> {
        policy.validate_hours(value)?;
        policy.validate_date(date)?;

        // normalize -0.0
        let value = if value == 0.0 { 0.0 } else { value };
        self.entries.insert(date, value);
        self.dirty = true;
        Ok(())
    }

    /// Sum of positive entries. Absent days add nothing.
    pub fn total_hours(&self) -> f64 {
        self.entries.values().filter(|h| **h > 0.0).sum()
    }

    pub fn clear_all(&mut self, _confirmed: ResetConfirmed) {
        self.entries.clear();
        self.dirty = true;
    }

    /// Replace every entry at once (import).
    pub fn replace_with(&mut self, other: HoursMap, _confirmed: ResetConfirmed) {
        self.entries = other.entries;
        self.dirty = true;
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(d, h)| (*d, *h))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Persisted shape: canonical date keys.
    pub fn to_wire(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(d, h)| (canonical_key(*d), *h))
            .collect()
    }

    /// Rebuild from the persisted shape. Keys that are not dates and values
    /// that are not finite non-negative numbers are skipped and returned.
    pub fn from_wire(wire: &BTreeMap<String, Value>) -> (Self, Vec<String>) {
        let mut map = HoursMap::new();
        let mut skipped = Vec::new();

        for (k, v) in wire {
            let date = NaiveDate::parse_from_str(k, "%Y-%m-%d");
            match (date, v.as_f64()) {
                (Ok(d), Some(h)) if h.is_finite() && h >= 0.0 => {
                    map.entries.insert(d, h);
                }
                _ => skipped.push(k.clone()),
            }
        }

        (map, skipped)
    }

    /// Strict variant used by import: any entry `from_wire` would skip
    /// rejects the whole file. Range and cap are not checked so that every
    /// export can be imported back.
    pub fn from_wire_checked(wire: &BTreeMap<String, f64>) -> AppResult<Self> {
        let mut map = HoursMap::new();

        for (k, v) in wire {
            let d = NaiveDate::parse_from_str(k, "%Y-%m-%d")
                .map_err(|_| AppError::InvalidDate(k.clone()))?;
            if !v.is_finite() || *v < 0.0 {
                return Err(AppError::validation(format!(
                    "{}: {} is not a valid number of hours.",
                    k, v
                )));
            }
            map.entries.insert(d, if *v == 0.0 { 0.0 } else { *v });
        }

        Ok(map)
    }
}
