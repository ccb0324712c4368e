use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{Flag, VenueCounts};
use crate::providers::ProfileDirectory;
use rusqlite::Connection;

/// Read-side logic: per-venue counts and attendee rosters.
pub struct CountsLogic;

impl CountsLogic {
    /// Both flag counts for one venue, from a single aggregation query.
    pub fn venue(conn: &Connection, venue_title: &str) -> AppResult<VenueCounts> {
        queries::venue_counts(conn, venue_title)
    }

    /// Count for one (venue, flag) filter.
    pub fn by_flag(conn: &Connection, venue_title: &str, flag: Flag) -> AppResult<i64> {
        queries::count_by_venue_and_flag(conn, venue_title, flag)
    }

    /// Display names of the users attending `venue_title` under `flag`.
    ///
    /// Each distinct user appears once even when they buzzed several times.
    /// A profile that cannot be resolved falls back to the raw user id
    /// rather than dropping the attendee from the list.
    pub fn roster(
        conn: &Connection,
        directory: &dyn ProfileDirectory,
        venue_title: &str,
        flag: Flag,
    ) -> AppResult<Vec<String>> {
        let records = queries::list_by_venue_and_flag(conn, venue_title, flag)?;

        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();

        for rec in records {
            if !seen.insert(rec.user_id.clone()) {
                continue;
            }
            match directory.get_profile(&rec.user_id) {
                Ok(profile) => names.push(profile.display_name),
                Err(AppError::NotFound(_)) => names.push(rec.user_id),
                Err(e) => return Err(e),
            }
        }

        Ok(names)
    }
}
