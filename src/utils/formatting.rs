//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let w = unicode_width::UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// Render an hours value with at most one decimal, dropping a trailing `.0`.
///
/// `7.0` → `7`, `7.25` → `7.3`, `1234.5` → `1234.5`
pub fn format_hours(h: f64) -> String {
    let rounded = (h * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Replace the characters of an email that are awkward in file names.
pub fn sanitize_email(email: &str) -> String {
    email.replace(['@', '.'], "_")
}
