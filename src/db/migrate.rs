use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check whether a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `tracking` table (live attendance submissions).
fn create_tracking_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tracking (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id            TEXT NOT NULL,
            venue_title        TEXT NOT NULL,
            venue_lat          REAL NOT NULL DEFAULT 0,
            venue_lon          REAL NOT NULL DEFAULT 0,
            currently_here     INTEGER NOT NULL DEFAULT 0,
            planning_to_attend INTEGER NOT NULL DEFAULT 0,
            created_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tracking_venue_here ON tracking(venue_title, currently_here);
        CREATE INDEX IF NOT EXISTS idx_tracking_venue_plan ON tracking(venue_title, planning_to_attend);
        CREATE INDEX IF NOT EXISTS idx_tracking_user ON tracking(user_id);
        "#,
    )?;
    Ok(())
}

/// Create the `historical_tracking` table (archive written by the reset job).
fn create_historical_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS historical_tracking (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id          INTEGER NOT NULL,
            user_id            TEXT NOT NULL,
            venue_title        TEXT NOT NULL,
            venue_lat          REAL NOT NULL DEFAULT 0,
            venue_lon          REAL NOT NULL DEFAULT 0,
            currently_here     INTEGER NOT NULL DEFAULT 0,
            planning_to_attend INTEGER NOT NULL DEFAULT 0,
            created_at         TEXT NOT NULL,
            archived_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_hist_record ON historical_tracking(record_id);
        CREATE INDEX IF NOT EXISTS idx_hist_archived_at ON historical_tracking(archived_at);
        "#,
    )?;
    Ok(())
}

/// Create the `users` table (profiles + verification gate).
fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id             TEXT PRIMARY KEY,
            email          TEXT NOT NULL UNIQUE,
            display_name   TEXT NOT NULL,
            email_verified INTEGER NOT NULL DEFAULT 0,
            push_token     TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the `otp_codes` table (one pending code per email, with expiry).
fn create_otp_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS otp_codes (
            email      TEXT PRIMARY KEY,
            code       TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `users` table has a `push_token` column.
fn users_has_push_token_column(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('users')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "push_token" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Early databases stored profiles without a device token. Add the column
/// in place; rows default to the empty token, which the reminder job skips.
fn migrate_add_push_token_column(conn: &Connection) -> Result<(), Error> {
    let version = "20250412_0004_add_push_token";

    // 1) Check if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(()); // already applied
    }

    if users_has_push_token_column(conn)? {
        // Fresh schema already carries the column; just mark the version.
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, 'push_token column present')",
            [version],
        )?;
        return Ok(());
    }

    // 2) Apply the migration
    conn.execute(
        "ALTER TABLE users ADD COLUMN push_token TEXT NOT NULL DEFAULT '';",
        [],
    )
    .map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Failed to add 'push_token' column: {}", e)),
        )
    })?;

    // 3) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added push_token to users')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} → added 'push_token' to users table",
        version
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Core tables
    let fresh = !table_exists(conn, "tracking")?;

    create_tracking_table(conn)?;
    create_historical_table(conn)?;
    create_users_table(conn)?;
    create_otp_table(conn)?;

    if fresh {
        success("Created attendance tables (modern schema).");
    }

    // 3) Stepwise migrations for databases created before the current schema
    migrate_add_push_token_column(conn)?;

    Ok(())
}
