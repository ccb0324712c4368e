use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::counts::CountsLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::Flag;
use crate::models::venue;
use crate::providers::DbDirectory;

/// List the display names of a venue's attendees under one flag.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Who { venue, flag } = cmd {
        let flag = Flag::from_code(flag)
            .ok_or_else(|| AppError::InvalidFlag(flag.to_string()))?;

        let title = venue::find(venue)
            .map(|v| v.title)
            .unwrap_or_else(|| venue.trim().to_string());

        let pool = DbPool::new(&cfg.database)?;
        let directory = DbDirectory { conn: &pool.conn };

        let names = CountsLogic::roster(&pool.conn, &directory, &title, flag)?;

        if names.is_empty() {
            println!("Nobody is {} at {} yet.", flag.label(), title);
            return Ok(());
        }

        println!("🍻 People {} at {}:\n", flag.label(), title);
        for name in names {
            println!("  • {}", name);
        }
    }

    Ok(())
}
