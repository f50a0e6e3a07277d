use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::LocalBackend;
use crate::errors::AppResult;
use crate::remote::OperationLog;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped with `--test`)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1️⃣ CONFIGURATION
    //
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing rHours…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    //
    // 2️⃣ DATABASE (tables + migrations)
    //
    let backend = LocalBackend::open(&cfg)?;

    println!("✅ Database initialized at {}", &cfg.database);

    //
    // 3️⃣ INTERNAL LOG
    //
    backend.record(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 rHours initialization completed!");
    Ok(())
}
