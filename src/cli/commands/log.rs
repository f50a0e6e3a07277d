use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        // opening the backend makes sure the log table exists
        let backend = super::open_backend(cfg)?;
        LogLogic::print_log(&backend.pool)?;
    }

    Ok(())
}
