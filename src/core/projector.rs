use crate::config::Config;
use crate::core::hours::HoursMap;
use chrono::{Datelike, Days, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Goal reached; no date is computed.
    Completed,
    Forecast { date: NaiveDate, days_needed: u32 },
}

/// Forecasts the day the goal is reached working `cap` hours a day,
/// skipping the non-working weekday.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub goal: f64,
    pub cap: f64,
    pub start_date: NaiveDate,
    pub non_working_day: Weekday,
}

impl Projector {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            goal: cfg.goal_hours,
            cap: cfg.max_hours_per_day,
            start_date: cfg.start_date,
            non_working_day: cfg.non_working_day,
        }
    }

    /// Later of the start date and the most recent entered date.
    pub fn anchor_date(&self, hours: &HoursMap) -> NaiveDate {
        match hours.latest_date() {
            Some(last) if last > self.start_date => last,
            _ => self.start_date,
        }
    }

    pub fn project(&self, total: f64, anchor: NaiveDate) -> Projection {
        if total >= self.goal {
            return Projection::Completed;
        }

        let days_needed = days_needed(total, self.goal, self.cap);
        Projection::Forecast {
            date: walk_working_days(anchor, days_needed, self.non_working_day),
            days_needed,
        }
    }

    /// Projection for the in-system entries plus the previous hours baseline.
    pub fn project_for(&self, hours: &HoursMap, previous_hours: f64) -> Projection {
        let total = hours.total_hours() + previous_hours;
        self.project(total, self.anchor_date(hours))
    }
}

/// `ceil((goal - total) / cap)`; at least 1 whenever `total < goal`.
pub fn days_needed(total: f64, goal: f64, cap: f64) -> u32 {
    let left = (goal - total).max(0.0);
    (left / cap).ceil() as u32
}

/// Step forward one day at a time from `anchor` (excluded) and return the
/// day on which `days` days other than `skip` have been counted.
pub fn walk_working_days(anchor: NaiveDate, days: u32, skip: Weekday) -> NaiveDate {
    let mut current = anchor;
    let mut counted = 0;

    while counted < days {
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
        if current.weekday() != skip {
            counted += 1;
        }
    }

    current
}
