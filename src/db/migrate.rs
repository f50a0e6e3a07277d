use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Every other migration records
/// itself there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251001_0001_credentials",
        description: "Created accounts, sessions and password reset tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS accounts (
            uid           TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            salt          TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            iterations    INTEGER NOT NULL,
            admin         INTEGER NOT NULL DEFAULT 0,
            disabled      INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token       TEXT PRIMARY KEY,
            uid         TEXT NOT NULL,
            admin       INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_uid ON sessions(uid);

        CREATE TABLE IF NOT EXISTS password_resets (
            code        TEXT PRIMARY KEY,
            uid         TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            used        INTEGER NOT NULL DEFAULT 0
        );
        "#,
    },
    Migration {
        version: "20251001_0002_documents",
        description: "Created documents and change feed tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS documents (
            path        TEXT PRIMARY KEY,
            collection  TEXT NOT NULL,
            doc_id      TEXT NOT NULL,
            fields      TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);

        CREATE TABLE IF NOT EXISTS changes (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            collection  TEXT NOT NULL,
            doc_id      TEXT NOT NULL,
            kind        TEXT NOT NULL CHECK(kind IN ('set','delete')),
            at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_changes_collection_seq ON changes(collection, seq);
        "#,
    },
    Migration {
        version: "20251020_0003_mail_outbox",
        description: "Created mail outbox for password reset messages",
        sql: r#"
        CREATE TABLE IF NOT EXISTS mail_outbox (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            recipient   TEXT NOT NULL,
            subject     TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Versions not applied yet, in order.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
