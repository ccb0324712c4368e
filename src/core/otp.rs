//! One-time signup codes, stored with an explicit expiry.
//!
//! One pending code per email: re-issuing replaces the previous entry, a
//! successful verify consumes it. Expiry is checked against the caller's
//! clock on every verify, so stale codes die even if nothing overwrites them.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};

fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

pub struct OtpLogic;

impl OtpLogic {
    /// Issue (or replace) the pending code for an email.
    pub fn issue(
        conn: &Connection,
        email: &str,
        ttl_minutes: i64,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let code = generate_code();
        let expires_at = (now + Duration::minutes(ttl_minutes)).to_rfc3339();

        conn.execute(
            "INSERT INTO otp_codes (email, code, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO UPDATE SET
                 code = excluded.code,
                 expires_at = excluded.expires_at",
            params![email, code, expires_at],
        )?;

        Ok(code)
    }

    /// Check and consume a code. A code verifies at most once.
    pub fn verify(
        conn: &Connection,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT code, expires_at FROM otp_codes WHERE email = ?1",
                [email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (stored, expires_at) =
            row.ok_or_else(|| AppError::Auth("invalid or expired code".into()))?;

        let expiry = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|_| AppError::Other(format!("unreadable code expiry '{}'", expires_at)))?
            .with_timezone(&Utc);

        if now > expiry {
            conn.execute("DELETE FROM otp_codes WHERE email = ?1", [email])?;
            return Err(AppError::Auth("invalid or expired code".into()));
        }

        if stored != code {
            // Wrong guess: the pending code stays usable until its expiry.
            return Err(AppError::Auth("invalid or expired code".into()));
        }

        conn.execute("DELETE FROM otp_codes WHERE email = ?1", [email])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn issue_then_verify_consumes_the_code() {
        let conn = test_conn();
        let now = Utc::now();

        let code = OtpLogic::issue(&conn, "a@x.edu", 5, now).unwrap();
        assert_eq!(code.len(), 6);

        OtpLogic::verify(&conn, "a@x.edu", &code, now).unwrap();

        // Second use fails: the code was consumed.
        assert!(matches!(
            OtpLogic::verify(&conn, "a@x.edu", &code, now).unwrap_err(),
            AppError::Auth(_)
        ));
    }

    #[test]
    fn expired_codes_are_rejected() {
        let conn = test_conn();
        let now = Utc::now();

        let code = OtpLogic::issue(&conn, "a@x.edu", 5, now).unwrap();
        let later = now + Duration::minutes(6);

        assert!(matches!(
            OtpLogic::verify(&conn, "a@x.edu", &code, later).unwrap_err(),
            AppError::Auth(_)
        ));
    }

    #[test]
    fn reissue_overwrites_the_previous_code() {
        let conn = test_conn();
        let now = Utc::now();

        let first = OtpLogic::issue(&conn, "a@x.edu", 5, now).unwrap();
        let second = OtpLogic::issue(&conn, "a@x.edu", 5, now).unwrap();

        if first != second {
            assert!(OtpLogic::verify(&conn, "a@x.edu", &first, now).is_err());
        }
        OtpLogic::verify(&conn, "a@x.edu", &second, now).unwrap();
    }

    #[test]
    fn wrong_guess_does_not_burn_the_code() {
        let conn = test_conn();
        let now = Utc::now();

        let code = OtpLogic::issue(&conn, "a@x.edu", 5, now).unwrap();
        assert!(OtpLogic::verify(&conn, "a@x.edu", "000000", now).is_err());

        // The real code still works afterwards.
        OtpLogic::verify(&conn, "a@x.edu", &code, now).unwrap();
    }
}
