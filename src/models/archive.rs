use super::venue::Venue;
use serde::Serialize;

/// A tracking row as frozen by the nightly reset job.
///
/// Carries every field of the source record plus the id it was archived from
/// and the archival instant. Archive rows are written once and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivedAttendance {
    pub id: i64,          // ⇔ historical_tracking.id
    pub record_id: i64,   // ⇔ id of the source tracking row
    pub user_id: String,
    pub venue: Venue,
    pub currently_here: bool,
    pub planning_to_attend: bool,
    pub created_at: String,
    pub archived_at: String, // RFC 3339, set by the reset job
}
