#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use barbuzz::models::user::Profile;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn bb() -> Command {
    cargo_bin_cmd!("barbuzz")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_barbuzz.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the schema through the CLI (same path a user takes)
pub fn init_db(db_path: &str) {
    bb().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Insert a profile directly through the library, bypassing the OTP flow.
/// Most tests want a known user id, which `signup` does not give them.
pub fn add_user(db_path: &str, id: &str, name: &str, verified: bool) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    barbuzz::db::initialize::init_db(&conn).expect("init db");
    barbuzz::db::users::insert_profile(
        &conn,
        &Profile {
            id: id.to_string(),
            email: format!("{}@villanova.edu", id),
            display_name: name.to_string(),
            email_verified: verified,
            push_token: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        },
    )
    .expect("insert user");
}

/// Record one submission via the CLI
pub fn buzz(db_path: &str, user: &str, venue: &str, here: bool, planning: bool) {
    let mut args = vec!["--db", db_path, "--test", "buzz", user, venue];
    if here {
        args.push("--here");
    }
    if planning {
        args.push("--planning");
    }
    bb().args(&args).assert().success();
}

/// Count rows of a table with an optional WHERE clause
pub fn count_rows(db_path: &str, table: &str, where_clause: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    let sql = if where_clause.is_empty() {
        format!("SELECT COUNT(*) FROM {}", table)
    } else {
        format!("SELECT COUNT(*) FROM {} WHERE {}", table, where_clause)
    };
    conn.query_row(&sql, [], |row| row.get(0)).expect("count")
}
