use crate::config::Config;
use crate::core::otp::OtpLogic;
use crate::db::log::bblog;
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::providers::{IdentityProvider, OtpMailer};
use chrono::Utc;
use regex::Regex;
use rusqlite::Connection;

/// Account creation and email verification.
///
/// One auth strategy only: accounts are created unverified, a mailed OTP
/// flips the gate. No password ever touches the store.
pub struct SignupLogic;

impl SignupLogic {
    fn email_pattern(domain: &str) -> AppResult<Regex> {
        Regex::new(&format!(r"^[A-Za-z0-9._%+-]+@{}$", regex::escape(domain)))
            .map_err(|e| AppError::Other(e.to_string()))
    }

    /// Create an unverified account and mail its verification code.
    pub fn apply(
        conn: &Connection,
        identity: &dyn IdentityProvider,
        mailer: &dyn OtpMailer,
        cfg: &Config,
        email: &str,
        display_name: &str,
    ) -> AppResult<String> {
        let email = email.trim().to_lowercase();
        let display_name = display_name.trim();

        //
        // 1. Validate inputs
        //
        if display_name.is_empty() {
            return Err(AppError::Validation("display name is required".into()));
        }

        let pattern = Self::email_pattern(&cfg.allowed_email_domain)?;
        if !pattern.is_match(&email) {
            return Err(AppError::Validation(format!(
                "please use a {} email address",
                cfg.allowed_email_domain
            )));
        }

        //
        // 2. Create the account (unverified)
        //
        let user_id = identity.create_account(&email, display_name)?;

        //
        // 3. Issue and mail the code
        //
        let code = OtpLogic::issue(conn, &email, cfg.otp_ttl_minutes, Utc::now())?;
        mailer.send_code(&email, &code, cfg.otp_ttl_minutes)?;

        let _ = bblog(
            conn,
            "signup",
            &email,
            &format!("account {} created, verification code sent", user_id),
        );

        Ok(user_id)
    }

    /// Confirm a signup: consume the OTP and flip the verification gate.
    pub fn confirm(conn: &Connection, email: &str, code: &str) -> AppResult<()> {
        let email = email.trim().to_lowercase();

        OtpLogic::verify(conn, &email, code.trim(), Utc::now())?;
        users::set_verified_by_email(conn, &email)?;

        let _ = bblog(conn, "verify", &email, "email verified");
        Ok(())
    }
}
