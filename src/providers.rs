//! Seams for the managed services the core talks to.
//!
//! Identity, profile lookup, push delivery, and OTP mail are consumed through
//! traits so the core never depends on a concrete vendor. The default
//! implementations below back identity and profiles with the local `users`
//! table and route push/mail to the console, which is all the CLI needs.

use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::user::Profile;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use rusqlite::Connection;

/// Result of verifying a credential with the identity provider.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: String,
    pub email_verified: bool,
}

pub trait IdentityProvider {
    /// Resolve a client-supplied token into a known identity.
    fn verify_credential(&self, token: &str) -> AppResult<Credential>;

    /// Register a new (unverified) account and return its user id.
    fn create_account(&self, email: &str, display_name: &str) -> AppResult<String>;
}

pub trait ProfileDirectory {
    fn get_profile(&self, user_id: &str) -> AppResult<Profile>;
}

#[derive(Debug, Clone)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
}

/// Per-token outcome reported by the push gateway.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub token: String,
    pub accepted: bool,
    pub detail: String,
}

pub trait PushGateway {
    fn send_push(&self, messages: &[PushMessage]) -> AppResult<Vec<Delivery>>;
}

pub trait OtpMailer {
    fn send_code(&self, email: &str, code: &str, ttl_minutes: i64) -> AppResult<()>;
}

// ---------------------------
// Default implementations
// ---------------------------

/// Identity backed by the local `users` table. The credential token IS the
/// user id; anything not present in the table is an unknown credential.
pub struct DbIdentity<'c> {
    pub conn: &'c Connection,
}

impl IdentityProvider for DbIdentity<'_> {
    fn verify_credential(&self, token: &str) -> AppResult<Credential> {
        match users::get_profile(self.conn, token)? {
            Some(profile) => Ok(Credential {
                user_id: profile.id,
                email_verified: profile.email_verified,
            }),
            None => Err(AppError::Auth(format!("unknown credential '{}'", token))),
        }
    }

    fn create_account(&self, email: &str, display_name: &str) -> AppResult<String> {
        if users::find_by_email(self.conn, email)?.is_some() {
            return Err(AppError::Validation(format!(
                "email {} is already registered",
                email
            )));
        }

        let user_id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(20)
            .map(char::from)
            .collect();

        let profile = Profile {
            id: user_id.clone(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            email_verified: false,
            push_token: String::new(),
            created_at: Utc::now().to_rfc3339(),
        };
        users::insert_profile(self.conn, &profile)?;

        Ok(user_id)
    }
}

/// Profile lookup backed by the local `users` table.
pub struct DbDirectory<'c> {
    pub conn: &'c Connection,
}

impl ProfileDirectory for DbDirectory<'_> {
    fn get_profile(&self, user_id: &str) -> AppResult<Profile> {
        users::get_profile(self.conn, user_id)?
            .ok_or_else(|| AppError::NotFound(format!("no user with id {}", user_id)))
    }
}

/// Push gateway that prints deliveries instead of calling Expo.
pub struct ConsolePushGateway;

impl PushGateway for ConsolePushGateway {
    fn send_push(&self, messages: &[PushMessage]) -> AppResult<Vec<Delivery>> {
        let mut out = Vec::with_capacity(messages.len());
        for msg in messages {
            println!("📲 [{}] {}: {}", msg.to, msg.title, msg.body);
            out.push(Delivery {
                token: msg.to.clone(),
                accepted: true,
                detail: "logged".to_string(),
            });
        }
        Ok(out)
    }
}

/// OTP mailer that prints the message instead of sending mail.
pub struct ConsoleMailer;

impl OtpMailer for ConsoleMailer {
    fn send_code(&self, email: &str, code: &str, ttl_minutes: i64) -> AppResult<()> {
        println!(
            "✉️  To {}: Your BarBuzz code is {}. It will expire in {} minutes.",
            email, code, ttl_minutes
        );
        Ok(())
    }
}
