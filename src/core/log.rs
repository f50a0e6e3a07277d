use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_TARGET_MAX: usize = 60;

/// ANSI colour for each logged operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "register" => Colour::Green,
        "delete_account" | "delete_credential" => Colour::Red,
        "save_hours" | "load_hours" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "grant_admin" | "password_reset" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("presence") => Colour::Cyan,
        _ => Colour::White,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut t = s.chars().take(max - 3).collect::<String>();
        t.push_str("...");
        t
    } else {
        s.to_string()
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let raw_date: String = row.get(1)?;
            let operation: String = row.get(2)?;
            let target: String = row.get(3)?;
            let message: String = row.get(4)?;

            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok((id, date, operation, target, message))
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        // op + target in one column, capped
        let columns: Vec<String> = entries
            .iter()
            .map(|(_, _, op, target, _)| {
                let joined = if target.is_empty() {
                    op.clone()
                } else {
                    format!("{op} ({target})")
                };
                truncate(&joined, OP_TARGET_MAX)
            })
            .collect();

        let op_w = columns.iter().map(|c| c.chars().count()).max().unwrap_or(10);
        let id_w = entries
            .iter()
            .map(|(id, _, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _, _, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for ((id, date, operation, _, message), column) in entries.iter().zip(columns) {
            let color = color_for_operation(operation);
            let padding = " ".repeat(op_w.saturating_sub(column.chars().count()));

            // only the operation word is coloured
            let colored = match column.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(column.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
