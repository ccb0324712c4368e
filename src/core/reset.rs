use crate::core::watch::WatchRegistry;
use crate::db::log::bblog;
use crate::db::pool::DbPool;
use crate::db::{archive, queries};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use chrono::{DateTime, Utc};

/// Outcome of a completed reset run.
#[derive(Debug, Clone, Copy)]
pub struct ResetReport {
    pub archived: usize,
}

/// The nightly archival job.
///
/// Moves every live submission into `historical_tracking` and clears both
/// flags on the originals, so the next day starts from a clean slate.
pub struct ResetLogic;

impl ResetLogic {
    /// Archive-and-reset the whole live table as one atomic batch.
    ///
    /// The archive inserts and the flag updates for ALL rows share a single
    /// transaction: a failure anywhere rolls everything back, leaving the
    /// store exactly as it was before the run. There is no retry here; the
    /// next scheduled run, a day later, picks up whatever this one left.
    pub fn apply(
        pool: &mut DbPool,
        watchers: &WatchRegistry,
        now: DateTime<Utc>,
    ) -> AppResult<ResetReport> {
        //
        // 1. Everything in the live table is a candidate, whatever its flags
        //
        let records = queries::load_all_tracking(&pool.conn)?;

        if records.is_empty() {
            info("No submissions to clear.");
            return Ok(ResetReport { archived: 0 });
        }

        let archived_at = now.to_rfc3339();

        //
        // 2. One transaction for the whole batch
        //
        let tx = pool.conn.transaction()?;

        let batch = (|| -> AppResult<()> {
            for rec in &records {
                archive::insert_archived(&tx, rec, &archived_at)?;
                queries::clear_flags(&tx, rec.id)?;
            }
            Ok(())
        })();

        if let Err(e) = batch {
            // Dropping the transaction rolls back every write issued so far.
            drop(tx);
            return Err(AppError::BatchCommit(e.to_string()));
        }

        tx.commit()
            .map_err(|e| AppError::BatchCommit(e.to_string()))?;

        let _ = bblog(
            &pool.conn,
            "reset",
            "daily",
            &format!("archived {} submission(s)", records.len()),
        );
        success(format!(
            "Daily submissions cleared ({} archived).",
            records.len()
        ));

        //
        // 3. Every venue that had rows now reports zeroed counts
        //
        let mut titles: Vec<&str> = records.iter().map(|r| r.venue.title.as_str()).collect();
        titles.sort();
        titles.dedup();
        for title in titles {
            if let Err(e) = watchers.notify(&pool.conn, title) {
                warning(format!("Failed to notify watchers for '{}': {}", title, e));
            }
        }

        Ok(ResetReport {
            archived: records.len(),
        })
    }
}
