use predicates::str::contains;

mod common;
use common::{add_user, bb, buzz, count_rows, init_db, setup_test_db};

use barbuzz::core::reset::ResetLogic;
use barbuzz::core::watch::WatchRegistry;
use barbuzz::db::pool::DbPool;
use barbuzz::errors::AppError;

#[test]
fn test_reset_on_empty_store_is_a_noop() {
    let db_path = setup_test_db("reset_empty");
    init_db(&db_path);

    bb().args(["--db", &db_path, "--test", "reset"])
        .assert()
        .success()
        .stdout(contains("No submissions to clear."));

    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 0);
}

#[test]
fn test_reset_archives_everything_and_clears_flags() {
    let db_path = setup_test_db("reset_archives");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);
    add_user(&db_path, "u2", "Navi", true);

    buzz(&db_path, "u1", "McSorley's", true, false);
    buzz(&db_path, "u2", "McSorley's", false, true);
    buzz(&db_path, "u2", "The Grog Grill", true, true);

    bb().args(["--db", &db_path, "--test", "reset"])
        .assert()
        .success()
        .stdout(contains("Daily submissions cleared (3 archived)."));

    // Every live row survived with both flags cleared
    assert_eq!(count_rows(&db_path, "tracking", ""), 3);
    assert_eq!(
        count_rows(
            &db_path,
            "tracking",
            "currently_here = 1 OR planning_to_attend = 1"
        ),
        0
    );

    // And every pre-run row has exactly one archive entry
    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 3);
}

#[test]
fn test_archive_preserves_original_fields() {
    let db_path = setup_test_db("reset_fields");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    buzz(&db_path, "u1", "The Grog Grill", true, true);

    let (id, created_at): (i64, String) = {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.query_row("SELECT id, created_at FROM tracking", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap()
    };

    bb().args(["--db", &db_path, "--test", "reset"])
        .assert()
        .success();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let (rec_id, user, title, here, planning, arch_created, archived_at): (
        i64,
        String,
        String,
        i64,
        i64,
        String,
        String,
    ) = conn
        .query_row(
            "SELECT record_id, user_id, venue_title, currently_here, planning_to_attend,
                    created_at, archived_at
             FROM historical_tracking",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            },
        )
        .unwrap();

    // The archive entry carries the pre-run state of the record, flags
    // included, plus the archival timestamp.
    assert_eq!(rec_id, id);
    assert_eq!(user, "u1");
    assert_eq!(title, "The Grog Grill");
    assert_eq!(here, 1);
    assert_eq!(planning, 1);
    assert_eq!(arch_created, created_at);
    assert!(!archived_at.is_empty());
}

#[test]
fn test_reset_takes_every_record_regardless_of_flags() {
    let db_path = setup_test_db("reset_all_records");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    buzz(&db_path, "u1", "McSorley's", true, false);

    // First reset archives it and zeroes the flags…
    bb().args(["--db", &db_path, "--test", "reset"])
        .assert()
        .success();
    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 1);

    // …and a second reset archives the now both-false row again.
    bb().args(["--db", &db_path, "--test", "reset"])
        .assert()
        .success()
        .stdout(contains("Daily submissions cleared (1 archived)."));
    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 2);
}

#[test]
fn test_failed_batch_leaves_the_store_untouched() {
    let db_path = setup_test_db("reset_atomic");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);
    add_user(&db_path, "u2", "Navi", true);
    add_user(&db_path, "u3", "Christina", true);

    buzz(&db_path, "u1", "McSorley's", true, false);
    buzz(&db_path, "u2", "McSorley's", false, true);
    buzz(&db_path, "u3", "The Grog Grill", true, true);

    let mut pool = DbPool::new(&db_path).unwrap();

    // Make the third archive insert blow up mid-batch.
    pool.conn
        .execute_batch(
            "CREATE TRIGGER abort_archiving BEFORE INSERT ON historical_tracking
             WHEN (SELECT COUNT(*) FROM historical_tracking) >= 2
             BEGIN SELECT RAISE(ABORT, 'archive unavailable'); END;",
        )
        .unwrap();

    let err = ResetLogic::apply(&mut pool, &WatchRegistry::new(), chrono::Utc::now()).unwrap_err();
    assert!(matches!(err, AppError::BatchCommit(_)));

    // No partial archival, no partial reset: the two rows archived before
    // the failure were rolled back with everything else.
    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 0);
    assert_eq!(
        count_rows(
            &db_path,
            "tracking",
            "currently_here = 1 OR planning_to_attend = 1"
        ),
        3
    );

    // After removing the fault the same run goes through.
    pool.conn
        .execute_batch("DROP TRIGGER abort_archiving;")
        .unwrap();
    let report = ResetLogic::apply(&mut pool, &WatchRegistry::new(), chrono::Utc::now()).unwrap();
    assert_eq!(report.archived, 3);
    assert_eq!(count_rows(&db_path, "historical_tracking", ""), 3);
}

#[test]
fn test_reset_notifies_watchers_with_zeroed_counts() {
    let db_path = setup_test_db("reset_watchers");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    buzz(&db_path, "u1", "McSorley's", true, true);

    let mut pool = DbPool::new(&db_path).unwrap();
    let watchers = WatchRegistry::new();

    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    let _handle = watchers.watch_counts("McSorley's", move |c| {
        sink.lock().unwrap().push(*c);
    });

    ResetLogic::apply(&mut pool, &watchers, chrono::Utc::now()).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].total(), 0);
}
