use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reminder::ReminderLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::providers::ConsolePushGateway;

/// Send the weekend reminder once, immediately.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Remind) {
        let pool = DbPool::new(&cfg.database)?;

        let report = ReminderLogic::apply(&pool.conn, &ConsolePushGateway, cfg.push_chunk_size)?;

        if report.skipped > 0 {
            println!("({} device token(s) skipped as malformed.)", report.skipped);
        }
    }

    Ok(())
}
