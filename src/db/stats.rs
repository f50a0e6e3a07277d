use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ACCOUNTS
    //
    let accounts = count(pool, "SELECT COUNT(*) FROM accounts")?;
    let admins = count(pool, "SELECT COUNT(*) FROM accounts WHERE admin = 1")?;
    println!(
        "{}• Accounts:{} {}{}{} ({} admin)",
        CYAN, RESET, GREEN, accounts, RESET, admins
    );

    //
    // 3) SESSIONS AND DOCUMENTS
    //
    let sessions = count(pool, "SELECT COUNT(*) FROM sessions")?;
    let documents = count(pool, "SELECT COUNT(*) FROM documents")?;
    let online = count(
        pool,
        "SELECT COUNT(*) FROM documents
         WHERE collection = 'presence' AND json_extract(fields, '$.online') = 1",
    )?;
    println!("{}• Open sessions:{} {}", CYAN, RESET, sessions);
    println!("{}• Documents:{} {}", CYAN, RESET, documents);
    println!("{}• Online now:{} {}", CYAN, RESET, online);

    //
    // 4) LAST WRITE
    //
    let last_write: Option<String> = pool
        .conn
        .query_row(
            "SELECT at FROM changes ORDER BY seq DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_last = last_write.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Last write:{} {}", CYAN, RESET, fmt_last);

    println!();
    Ok(())
}
