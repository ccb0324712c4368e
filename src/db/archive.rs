use crate::errors::AppResult;
use crate::models::archive::ArchivedAttendance;
use crate::models::attendance::AttendanceRecord;
use crate::models::venue::{Coordinates, Venue};
use rusqlite::{Connection, Result, Row, params};

fn map_archived_row(row: &Row) -> Result<ArchivedAttendance> {
    Ok(ArchivedAttendance {
        id: row.get("id")?,
        record_id: row.get("record_id")?,
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
        archived_at: row.get("archived_at")?,
    })
}

/// Copy one live row into the archive, stamping it with `archived_at`.
pub fn insert_archived(
    conn: &Connection,
    rec: &AttendanceRecord,
    archived_at: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO historical_tracking
             (record_id, user_id, venue_title, venue_lat, venue_lon,
              currently_here, planning_to_attend, created_at, archived_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            rec.id,
            rec.user_id,
            rec.venue.title,
            rec.venue.coordinates.lat,
            rec.venue.coordinates.lon,
            if rec.currently_here { 1 } else { 0 },
            if rec.planning_to_attend { 1 } else { 0 },
            rec.created_at,
            archived_at,
        ],
    )?;
    Ok(())
}

pub fn count_archived(conn: &Connection) -> AppResult<i64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM historical_tracking", [], |row| {
        row.get(0)
    })?;
    Ok(n)
}

/// All archive entries produced from a given live row, oldest first.
pub fn list_archived_by_record(
    conn: &Connection,
    record_id: i64,
) -> AppResult<Vec<ArchivedAttendance>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM historical_tracking
         WHERE record_id = ?1
         ORDER BY archived_at ASC",
    )?;
    let rows = stmt.query_map([record_id], map_archived_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
