use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::signup::SignupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Confirm a signup with the emailed one-time code.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Verify { email, code } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        SignupLogic::confirm(&pool.conn, email, code)?;

        success(format!("{} is verified. Time to buzz in!", email));
    }

    Ok(())
}
