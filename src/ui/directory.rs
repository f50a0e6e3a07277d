use crate::core::admin::{DirectoryCounts, DirectoryEntry, PresenceLabel};
use crate::utils::colors::{GREEN, GREY, RESET, YELLOW};
use crate::utils::table::{Column, Table};
use chrono::{DateTime, Duration, Utc};

fn label_text(label: PresenceLabel) -> &'static str {
    match label {
        PresenceLabel::Online => "🟢 online",
        PresenceLabel::Stale => "🟡 stale",
        PresenceLabel::Offline => "⚪ offline",
    }
}

pub fn render_directory(
    entries: &[DirectoryEntry],
    counts: DirectoryCounts,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> String {
    let email_w = entries
        .iter()
        .map(|e| e.email.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut table = Table::new(vec![
        Column::new("Email", email_w),
        Column::new("UID", 28),
        Column::new("Status", 11),
        Column::new("Last seen", 20),
    ]);

    for e in entries {
        let last_seen = e
            .last_seen
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".into());

        table.add_row(vec![
            e.email.clone().unwrap_or_else(|| "-".into()),
            e.uid.clone(),
            label_text(e.presence_label(now, stale_after)).to_string(),
            last_seen,
        ]);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "👥 Users: {}   {GREEN}Online: {}{RESET}\n\n",
        counts.total, counts.online
    ));

    if entries.is_empty() {
        out.push_str(&format!("{GREY}No users.{RESET}\n"));
        return out;
    }

    out.push_str(&table.render());

    if entries
        .iter()
        .any(|e| e.presence_label(now, stale_after) == PresenceLabel::Stale)
    {
        out.push_str(&format!(
            "\n{YELLOW}stale{RESET}: marked online but no heartbeat for over {}s\n",
            stale_after.num_seconds()
        ));
    }

    out
}
