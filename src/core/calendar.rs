//! Month grid computed from the hours model; rendering lives in `ui::calendar`.

use crate::core::hours::{DayState, HoursMap, HoursPolicy};
use crate::errors::{AppError, AppResult};
use crate::utils::date::{all_days_of_month, first_of_month, month_name};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Outside the tracked range: shown, never editable.
    OutOfRange,
    /// Designated non-working weekday: shown, never editable.
    NonWorking,
    Workday,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub kind: CellKind,
    pub state: DayState,
}

impl DayCell {
    pub fn is_editable(&self) -> bool {
        self.kind == CellKind::Workday
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st, weeks start on Sunday.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl CalendarMonth {
    pub fn build(year: i32, month: u32, hours: &HoursMap, policy: &HoursPolicy) -> AppResult<Self> {
        let first = first_of_month(year, month)
            .ok_or_else(|| AppError::InvalidMonth(format!("{year}-{month:02}")))?;

        let days = all_days_of_month(year, month)
            .into_iter()
            .map(|date| {
                let kind = if !policy.contains(date) {
                    CellKind::OutOfRange
                } else if !policy.is_working_day(date) {
                    CellKind::NonWorking
                } else {
                    CellKind::Workday
                };
                // out-of-range days never show hours
                let state = if kind == CellKind::OutOfRange {
                    DayState::Unrecorded
                } else {
                    hours.state(date)
                };
                DayCell { date, kind, state }
            })
            .collect();

        Ok(Self {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    /// Hours recorded in this month (positive entries only).
    pub fn month_total(&self) -> f64 {
        self.days
            .iter()
            .filter_map(|c| match c.state {
                DayState::Worked(h) => Some(h),
                _ => None,
            })
            .sum()
    }
}

/// Month navigation bounded by the tracked range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
    min: (i32, u32),
    max: (i32, u32),
}

impl MonthCursor {
    /// Cursor on the given month; fails when the month is outside the range.
    pub fn new(year: i32, month: u32, policy: &HoursPolicy) -> AppResult<Self> {
        let min = (policy.min_date.year(), policy.min_date.month());
        let max = (policy.max_date.year(), policy.max_date.month());

        if !(1..=12).contains(&month) || (year, month) < min || (year, month) > max {
            return Err(AppError::InvalidMonth(format!(
                "{year}-{month:02} is outside {}-{:02} .. {}-{:02}",
                min.0, min.1, max.0, max.1
            )));
        }

        Ok(Self { year, month, min, max })
    }

    /// Cursor on the month of `date`, clamped into the range.
    pub fn clamped(date: NaiveDate, policy: &HoursPolicy) -> Self {
        let min = (policy.min_date.year(), policy.min_date.month());
        let max = (policy.max_date.year(), policy.max_date.month());
        let (year, month) = (date.year(), date.month()).clamp(min, max);
        Self { year, month, min, max }
    }

    pub fn can_go_back(&self) -> bool {
        (self.year, self.month) > self.min
    }

    pub fn can_go_forward(&self) -> bool {
        (self.year, self.month) < self.max
    }

    /// Move one month back; no-op on the first month of the range.
    pub fn prev(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
        true
    }

    /// Move one month forward; no-op on the last month of the range.
    pub fn next(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        true
    }
}
