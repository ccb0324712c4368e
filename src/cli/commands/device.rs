use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::users;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Attach an Expo push token to a user profile.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Device { user, token } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        users::set_push_token(&pool.conn, user, token)?;

        success(format!("Push token registered for {}.", user));
    }

    Ok(())
}
