use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) LIVE SUBMISSIONS
    //
    let live: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM tracking", [], |row| row.get(0))?;
    println!(
        "{}• Live submissions:{} {}{}{}",
        CYAN, RESET, GREEN, live, RESET
    );

    //
    // 3) ARCHIVED SUBMISSIONS + LAST RESET RUN
    //
    let archived: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM historical_tracking", [], |row| {
            row.get(0)
        })?;
    println!(
        "{}• Archived submissions:{} {}{}{}",
        CYAN, RESET, GREEN, archived, RESET
    );

    let last_reset: Option<String> = pool
        .conn
        .query_row(
            "SELECT archived_at FROM historical_tracking ORDER BY archived_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!(
        "{}• Last archival:{} {}",
        CYAN,
        RESET,
        last_reset.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) USERS
    //
    let (users, verified): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(email_verified), 0) FROM users",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Users:{} {} ({} verified)",
        CYAN, RESET, users, verified
    );

    println!();
    Ok(())
}
