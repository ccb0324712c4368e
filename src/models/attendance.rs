use super::venue::Venue;
use chrono::Utc;
use serde::Serialize;

/// One attendance submission.
///
/// Submissions are additive: every buzz-in creates a brand-new row, there is
/// no one-row-per-user upsert. "How many people are at bar X" is always a
/// count over qualifying rows.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,            // ⇔ tracking.id (assigned by SQLite on insert)
    pub user_id: String,    // ⇔ tracking.user_id
    pub venue: Venue,       // ⇔ tracking.venue_title / venue_lat / venue_lon
    pub currently_here: bool,
    pub planning_to_attend: bool,
    pub created_at: String, // ⇔ tracking.created_at (RFC 3339, UTC)
}

impl AttendanceRecord {
    /// Build a record ready for insertion (`id = 0` until the DB assigns one).
    pub fn new(user_id: &str, venue: Venue, currently_here: bool, planning_to_attend: bool) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            venue,
            currently_here,
            planning_to_attend,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// The two independent attendance flags.
///
/// Nothing enforces exclusivity: a row may carry both flags true (two quick
/// taps in the client) or both false (after the nightly reset). Queries treat
/// each flag on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Flag {
    CurrentlyHere,
    PlanningToAttend,
}

impl Flag {
    /// Column name in the `tracking` / `historical_tracking` tables.
    pub fn column(&self) -> &'static str {
        match self {
            Flag::CurrentlyHere => "currently_here",
            Flag::PlanningToAttend => "planning_to_attend",
        }
    }

    /// Parse the short codes accepted on the command line.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "here" | "currently_here" => Some(Flag::CurrentlyHere),
            "planning" | "planning_to_attend" => Some(Flag::PlanningToAttend),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Flag::CurrentlyHere => "currently here",
            Flag::PlanningToAttend => "planning to attend",
        }
    }
}

/// Both per-venue counts, produced by a single aggregation query.
///
/// `total()` is the naive sum the app displays: a user with both flags true
/// is counted twice. That is the established behavior, kept on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VenueCounts {
    pub currently_here: i64,
    pub planning_to_attend: i64,
}

impl VenueCounts {
    pub fn total(&self) -> i64 {
        self.currently_here + self.planning_to_attend
    }
}
