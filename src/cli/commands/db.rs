use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::LocalBackend;
use crate::db::backend::CHANGE_RETENTION_SECS;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use crate::utils::path::expand_tilde;
use chrono::{Duration, Utc};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let db_path = expand_tilde(&cfg.database).to_string_lossy().to_string();
        let pool = DbPool::new(&db_path)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            let pending = pending_migrations(&pool.conn)?;
            if pending.is_empty() {
                println!("{}✔ Database is up to date.{}\n", GREEN, RESET);
            } else {
                println!("{}▶ Running {} migration(s)…{}", CYAN, pending.len(), RESET);
                run_pending_migrations(&pool.conn)?;
                println!("{}✔ Migration completed.{}\n", GREEN, RESET);
            }
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&pool, &db_path)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            let cutoff = LocalBackend::rfc3339(Utc::now() - Duration::seconds(CHANGE_RETENTION_SECS));
            let pruned = pool.conn.execute(
                "DELETE FROM changes
                 WHERE at <= ?1 AND seq < (SELECT MAX(seq) FROM changes)",
                [cutoff],
            )?;
            println!("{}• Pruned change rows:{} {}", CYAN, RESET, pruned);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
