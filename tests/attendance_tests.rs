use predicates::prelude::PredicateBooleanExt;
use predicates::str::{contains, is_match};

mod common;
use common::{add_user, bb, buzz, count_rows, init_db, setup_test_db};

#[test]
fn test_buzz_rejects_unknown_user() {
    let db_path = setup_test_db("buzz_unknown_user");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "buzz",
        "nobody",
        "McSorley's",
        "--here",
    ])
    .assert()
    .failure()
    .stderr(contains("Authentication error"));

    assert_eq!(count_rows(&db_path, "tracking", ""), 0);
}

#[test]
fn test_buzz_rejects_unverified_user() {
    let db_path = setup_test_db("buzz_unverified");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", false);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "buzz",
        "u1",
        "McSorley's",
        "--here",
    ])
    .assert()
    .failure()
    .stderr(contains("Authentication error"))
    .stderr(contains("not verified"));

    // The rejected submission left nothing behind
    assert_eq!(count_rows(&db_path, "tracking", ""), 0);
}

#[test]
fn test_buzz_rejects_blank_venue() {
    let db_path = setup_test_db("buzz_blank_venue");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    bb().args(["--db", &db_path, "--test", "buzz", "u1", " ", "--here"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));
}

#[test]
fn test_buzz_records_attendance() {
    let db_path = setup_test_db("buzz_records");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "buzz",
        "u1",
        "The Grog Grill",
        "--here",
    ])
    .assert()
    .success()
    .stdout(contains("Buzzed in at The Grog Grill"));

    assert_eq!(
        count_rows(&db_path, "tracking", "venue_title = 'The Grog Grill' AND currently_here = 1"),
        1
    );
}

#[test]
fn test_submissions_are_additive_not_upserted() {
    let db_path = setup_test_db("buzz_additive");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    buzz(&db_path, "u1", "McSorley's", true, false);
    buzz(&db_path, "u1", "McSorley's", true, false);
    buzz(&db_path, "u1", "McSorley's", false, true);

    // Three buzzes, three rows: no dedup per user
    assert_eq!(count_rows(&db_path, "tracking", ""), 3);
}

#[test]
fn test_counts_match_qualifying_records() {
    let db_path = setup_test_db("counts_basic");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);
    add_user(&db_path, "u2", "Navi", true);
    add_user(&db_path, "u3", "Christina", true);

    // L1: one "here", one "planning". L2: one record with both flags.
    buzz(&db_path, "u1", "Kelly's Taproom", true, false);
    buzz(&db_path, "u2", "Kelly's Taproom", false, true);
    buzz(&db_path, "u3", "The Grog Grill", true, true);

    bb().args(["--db", &db_path, "--test", "counts", "Kelly's Taproom"])
        .assert()
        .success()
        .stdout(is_match(r"here +1").unwrap())
        .stdout(is_match(r"planning +1").unwrap())
        .stdout(contains("2 people"));

    bb().args(["--db", &db_path, "--test", "counts", "The Grog Grill"])
        .assert()
        .success()
        .stdout(is_match(r"here +1").unwrap())
        .stdout(is_match(r"planning +1").unwrap());
}

#[test]
fn test_both_flags_double_count_in_total() {
    let db_path = setup_test_db("counts_double");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    // One person, both flags: the displayed total is 2, not 1.
    buzz(&db_path, "u1", "Flip & Bailey's", true, true);

    bb().args(["--db", &db_path, "--test", "counts", "Flip & Bailey's"])
        .assert()
        .success()
        .stdout(contains("2 people"));
}

#[test]
fn test_counts_whole_catalog_lists_every_venue() {
    let db_path = setup_test_db("counts_catalog");
    init_db(&db_path);

    bb().args(["--db", &db_path, "--test", "counts"])
        .assert()
        .success()
        .stdout(contains("Kelly's Taproom"))
        .stdout(contains("The Grog Grill"))
        .stdout(contains("McSorley's"))
        .stdout(contains("Flip & Bailey's"));
}

#[test]
fn test_counts_json_output() {
    let db_path = setup_test_db("counts_json");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie", true);

    buzz(&db_path, "u1", "McSorley's", true, true);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "counts",
        "McSorley's",
        "--json",
    ])
    .assert()
    .success()
    .stdout(contains("\"venue\": \"McSorley's\""))
    .stdout(contains("\"currently_here\": 1"))
    .stdout(contains("\"total\": 2"));
}

#[test]
fn test_who_lists_display_names_per_flag() {
    let db_path = setup_test_db("who_names");
    init_db(&db_path);
    add_user(&db_path, "u1", "Ellie McLaughlin", true);
    add_user(&db_path, "u2", "Navi Singh", true);

    buzz(&db_path, "u1", "McSorley's", true, false);
    buzz(&db_path, "u2", "McSorley's", false, true);

    bb().args(["--db", &db_path, "--test", "who", "McSorley's"])
        .assert()
        .success()
        .stdout(contains("Ellie McLaughlin"))
        .stdout(contains("Navi Singh").not());

    bb().args([
        "--db",
        &db_path,
        "--test",
        "who",
        "McSorley's",
        "--flag",
        "planning",
    ])
    .assert()
    .success()
    .stdout(contains("Navi Singh"))
    .stdout(contains("Ellie McLaughlin").not());
}

#[test]
fn test_who_rejects_unknown_flag() {
    let db_path = setup_test_db("who_bad_flag");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "who",
        "McSorley's",
        "--flag",
        "maybe",
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid attendance flag"));
}
