use predicates::str::contains;
use regex::Regex;

mod common;
use common::{bb, count_rows, init_db, setup_test_db};

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

#[test]
fn test_signup_rejects_foreign_domains() {
    let db_path = setup_test_db("signup_domain");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "signup",
        "someone@gmail.com",
        "--name",
        "Someone",
    ])
    .assert()
    .failure()
    .stderr(contains("Validation error"))
    .stderr(contains("villanova.edu"));

    assert_eq!(count_rows(&db_path, "users", ""), 0);
}

#[test]
fn test_signup_verify_then_buzz() {
    let db_path = setup_test_db("signup_flow");
    init_db(&db_path);

    // 1) Signup prints the mailed code (console mailer) and the user id.
    let assert = bb()
        .args([
            "--db",
            &db_path,
            "--test",
            "signup",
            "ellie@villanova.edu",
            "--name",
            "Ellie McLaughlin",
        ])
        .assert()
        .success()
        .stdout(contains("Account created for ellie@villanova.edu"));
    let out = stdout_of(assert);

    let code = Regex::new(r"code is (\d{6})")
        .unwrap()
        .captures(&out)
        .expect("code in output")[1]
        .to_string();
    let user_id = Regex::new(r"user id: ([A-Za-z0-9]+)\)")
        .unwrap()
        .captures(&out)
        .expect("user id in output")[1]
        .to_string();

    // 2) Unverified accounts cannot buzz yet.
    bb().args([
        "--db",
        &db_path,
        "--test",
        "buzz",
        &user_id,
        "McSorley's",
        "--here",
    ])
    .assert()
    .failure()
    .stderr(contains("Authentication error"));

    // 3) Verify with the mailed code.
    bb().args([
        "--db",
        &db_path,
        "--test",
        "verify",
        "ellie@villanova.edu",
        &code,
    ])
    .assert()
    .success()
    .stdout(contains("is verified"));

    // 4) Now the buzz goes through.
    bb().args([
        "--db",
        &db_path,
        "--test",
        "buzz",
        &user_id,
        "McSorley's",
        "--here",
    ])
    .assert()
    .success();

    assert_eq!(count_rows(&db_path, "tracking", ""), 1);
}

#[test]
fn test_wrong_code_is_rejected() {
    let db_path = setup_test_db("signup_wrong_code");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "signup",
        "navi@villanova.edu",
        "--name",
        "Navi",
    ])
    .assert()
    .success();

    // 000000 can never be generated (codes start at 100000).
    bb().args([
        "--db",
        &db_path,
        "--test",
        "verify",
        "navi@villanova.edu",
        "000000",
    ])
    .assert()
    .failure()
    .stderr(contains("Authentication error"));

    assert_eq!(count_rows(&db_path, "users", "email_verified = 1"), 0);
}

#[test]
fn test_verify_without_pending_code_fails() {
    let db_path = setup_test_db("signup_no_code");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "verify",
        "ghost@villanova.edu",
        "123456",
    ])
    .assert()
    .failure()
    .stderr(contains("Authentication error"));
}

#[test]
fn test_duplicate_signup_is_rejected() {
    let db_path = setup_test_db("signup_duplicate");
    init_db(&db_path);

    bb().args([
        "--db",
        &db_path,
        "--test",
        "signup",
        "christina@villanova.edu",
        "--name",
        "Christina",
    ])
    .assert()
    .success();

    bb().args([
        "--db",
        &db_path,
        "--test",
        "signup",
        "christina@villanova.edu",
        "--name",
        "Christina Again",
    ])
    .assert()
    .failure()
    .stderr(contains("already registered"));

    assert_eq!(count_rows(&db_path, "users", ""), 1);
}
