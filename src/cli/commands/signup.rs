use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::signup::SignupLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::providers::{ConsoleMailer, DbIdentity};
use crate::ui::messages::success;

/// Create an unverified account and mail its verification code.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Signup {
        email,
        display_name,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let identity = DbIdentity { conn: &pool.conn };

        let user_id = SignupLogic::apply(
            &pool.conn,
            &identity,
            &ConsoleMailer,
            cfg,
            email,
            display_name,
        )?;

        success(format!(
            "Account created for {} (user id: {}). Verify with the emailed code.",
            email, user_id
        ));
    }

    Ok(())
}
