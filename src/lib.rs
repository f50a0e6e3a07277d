//! rHours library root.
//! Exposes the CLI parser, the high-level run() function and the
//! internal modules (hours model, projector, session controller,
//! admin directory and the SQLite-backed services).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod remote;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Register { .. } => commands::register::handle(&cli.command, cfg),
        Commands::Login { .. } => commands::login::handle(&cli.command, cfg),
        Commands::Logout => commands::logout::handle(cfg),
        Commands::PasswordReset { .. } => commands::password_reset::handle(&cli.command, cfg),
        Commands::Set { .. } => commands::set::handle(&cli.command, cfg),
        Commands::Show { .. } => commands::show::handle(&cli.command, cfg),
        Commands::Summary => commands::summary::handle(cfg),
        Commands::Previous { .. } => commands::previous::handle(&cli.command, cfg),
        Commands::Reset { .. } => commands::reset::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Import { .. } => commands::import::handle(&cli.command, cfg),
        Commands::Admin { .. } => commands::admin::handle(&cli.command, cfg),
        Commands::GrantAdmin { .. } => commands::grant_admin::handle(&cli.command, cfg),
        Commands::Watch { .. } => commands::watch::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command line override of the database
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db)
            .to_string_lossy()
            .to_string();
    }

    // 4️⃣ reject settings the model cannot work with
    cfg.validate()?;

    dispatch(&cli, &cfg)
}
