//! Terminal rendering of a `CalendarMonth`.

use crate::core::calendar::{CalendarMonth, CellKind, DayCell, MonthCursor};
use crate::core::hours::DayState;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::format_hours;
use crate::utils::formatting::{bold, pad_right};
use chrono::Datelike;

const CELL_W: usize = 9;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Text shown under the day number.
fn cell_value(cell: &DayCell) -> String {
    match (cell.kind, cell.state) {
        (CellKind::OutOfRange, _) => String::new(),
        (_, DayState::Unrecorded) => "·".to_string(),
        (_, DayState::Absent) => "absent".to_string(),
        (_, DayState::Worked(h)) => format!("{}h", format_hours(h)),
    }
}

fn paint(cell: &DayCell, text: &str) -> String {
    let padded = pad_right(text, CELL_W);
    match (cell.kind, cell.state) {
        (CellKind::OutOfRange, _) | (CellKind::NonWorking, _) => format!("{GREY}{padded}{RESET}"),
        (_, DayState::Worked(_)) => format!("{GREEN}{padded}{RESET}"),
        (_, DayState::Absent) => format!("{YELLOW}{padded}{RESET}"),
        (_, DayState::Unrecorded) => padded,
    }
}

/// Render the month as a week grid, Sunday first.
pub fn render_month(month: &CalendarMonth, cursor: Option<&MonthCursor>) -> String {
    let mut out = String::new();

    out.push_str(&format!("📅 {}\n\n", bold(&month.title())));

    for wd in WEEKDAYS {
        out.push_str(&format!("{CYAN}{}{RESET}", pad_right(wd, CELL_W)));
    }
    out.push('\n');

    let blanks = month.leading_blanks as usize;
    let mut slots: Vec<Option<&DayCell>> = vec![None; blanks];
    slots.extend(month.days.iter().map(Some));

    for week in slots.chunks(7) {
        // day numbers
        for slot in week {
            match slot {
                Some(cell) => out.push_str(&paint(cell, &cell.date.day().to_string())),
                None => out.push_str(&" ".repeat(CELL_W)),
            }
        }
        out.push('\n');

        // values
        for slot in week {
            match slot {
                Some(cell) => out.push_str(&paint(cell, &cell_value(cell))),
                None => out.push_str(&" ".repeat(CELL_W)),
            }
        }
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "Month total: {}h\n",
        bold(&format_hours(month.month_total()))
    ));

    if let Some(c) = cursor {
        let back = if c.can_go_back() { "◀ --month earlier" } else { "" };
        let fwd = if c.can_go_forward() { "--month later ▶" } else { "" };
        if !back.is_empty() || !fwd.is_empty() {
            out.push_str(&format!("{GREY}{back}  {fwd}{RESET}\n"));
        }
    }

    out.push_str(&format!(
        "{GREY}Legend: · not recorded, absent = 0h, grey = not editable{RESET}\n"
    ));

    out
}
