use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reset::ResetLogic;
use crate::core::watch::WatchRegistry;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use chrono::Utc;

/// Run the daily archive-and-reset once, immediately.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Reset) {
        let mut pool = DbPool::new(&cfg.database)?;
        let watchers = WatchRegistry::new();

        let report = ResetLogic::apply(&mut pool, &watchers, Utc::now())?;

        if report.archived > 0 {
            println!("🗄️  {} submission(s) moved to history.", report.archived);
        }
    }

    Ok(())
}
