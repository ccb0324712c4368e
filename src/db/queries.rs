use crate::errors::AppResult;
use crate::models::attendance::{AttendanceRecord, Flag, VenueCounts};
use crate::models::venue::{Coordinates, Venue};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        venue: Venue {
            title: row.get("venue_title")?,
            coordinates: Coordinates {
                lat: row.get("venue_lat")?,
                lon: row.get("venue_lon")?,
            },
        },
        currently_here: row.get::<_, i64>("currently_here")? == 1,
        planning_to_attend: row.get::<_, i64>("planning_to_attend")? == 1,
        created_at: row.get("created_at")?,
    })
}

/// Insert a new attendance row and return its id.
/// Every call inserts; there is no dedup against prior rows for the same user.
pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tracking (user_id, venue_title, venue_lat, venue_lon,
                               currently_here, planning_to_attend, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            rec.user_id,
            rec.venue.title,
            rec.venue.coordinates.lat,
            rec.venue.coordinates.lon,
            if rec.currently_here { 1 } else { 0 },
            if rec.planning_to_attend { 1 } else { 0 },
            rec.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Number of rows for a venue where the given flag is set.
pub fn count_by_venue_and_flag(conn: &Connection, venue_title: &str, flag: Flag) -> AppResult<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM tracking WHERE venue_title = ?1 AND {} = 1",
        flag.column()
    );
    let n: i64 = conn.query_row(&sql, [venue_title], |row| row.get(0))?;
    Ok(n)
}

/// Both flag counts for a venue in one pass.
///
/// A row with both flags set contributes to both columns, so the displayed
/// total (the sum) can exceed the number of distinct users.
pub fn venue_counts(conn: &Connection, venue_title: &str) -> AppResult<VenueCounts> {
    let counts = conn.query_row(
        "SELECT IFNULL(SUM(currently_here), 0), IFNULL(SUM(planning_to_attend), 0)
         FROM tracking
         WHERE venue_title = ?1",
        [venue_title],
        |row| {
            Ok(VenueCounts {
                currently_here: row.get(0)?,
                planning_to_attend: row.get(1)?,
            })
        },
    )?;
    Ok(counts)
}

/// Rows for a venue where the given flag is set. Order is not significant.
pub fn list_by_venue_and_flag(
    conn: &Connection,
    venue_title: &str,
    flag: Flag,
) -> AppResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT * FROM tracking WHERE venue_title = ?1 AND {} = 1",
        flag.column()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([venue_title], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The whole live table, regardless of flag state. Used by the reset job.
pub fn load_all_tracking(conn: &Connection) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM tracking ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Distinct venue titles currently present in the live table.
pub fn distinct_venue_titles(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT venue_title FROM tracking")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Clear both flags of a single row. Issued inside the reset transaction.
pub fn clear_flags(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE tracking SET currently_here = 0, planning_to_attend = 0 WHERE id = ?1",
        [id],
    )?;
    Ok(())
}
