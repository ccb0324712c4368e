use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::submit::{SubmitLogic, SubmitRequest};
use crate::core::watch::WatchRegistry;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::venue::{self, Venue};
use crate::ui::messages::success;

/// Record one attendance submission.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Buzz {
        user,
        venue,
        here,
        planning,
    } = cmd
    {
        //
        // 1. Resolve the venue: catalog snapshot if known, otherwise store
        //    the title as given (the store accepts any venue value).
        //
        let venue_value = venue::find(venue)
            .unwrap_or_else(|| Venue::new(venue.trim(), 0.0, 0.0));

        //
        // 2. Submit
        //
        let pool = DbPool::new(&cfg.database)?;
        let identity = crate::providers::DbIdentity { conn: &pool.conn };
        let watchers = WatchRegistry::new();

        let req = SubmitRequest {
            credential: user.clone(),
            venue: venue_value,
            currently_here: *here,
            planning_to_attend: *planning,
        };
        let id = SubmitLogic::apply(&pool.conn, &identity, &watchers, &req)?;

        success(format!(
            "Buzzed in at {} (record #{}, here={}, planning={}).",
            req.venue.title, id, here, planning
        ));
    }

    Ok(())
}
