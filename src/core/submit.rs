use crate::core::watch::WatchRegistry;
use crate::db::log::bblog;
use crate::db::queries::insert_attendance;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::venue::Venue;
use crate::providers::IdentityProvider;
use crate::ui::messages::warning;
use rusqlite::Connection;

/// One buzz-in as received from a client.
///
/// Fields are validated explicitly before anything touches the store; the
/// flags are passed through as-is, in any combination.
pub struct SubmitRequest {
    pub credential: String,
    pub venue: Venue,
    pub currently_here: bool,
    pub planning_to_attend: bool,
}

impl SubmitRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.credential.trim().is_empty() {
            return Err(AppError::Validation("user id is required".into()));
        }
        if self.venue.title.trim().is_empty() {
            return Err(AppError::Validation("location is required".into()));
        }
        Ok(())
    }
}

/// High-level business logic for recording attendance.
pub struct SubmitLogic;

impl SubmitLogic {
    /// Verify the caller, insert a fresh record, and wake the watchers.
    ///
    /// Every successful call appends a new row; nothing is merged with the
    /// user's earlier submissions for the same venue.
    pub fn apply(
        conn: &Connection,
        identity: &dyn IdentityProvider,
        watchers: &WatchRegistry,
        req: &SubmitRequest,
    ) -> AppResult<i64> {
        //
        // 1. Field validation
        //
        req.validate()?;

        //
        // 2. Identity gate: unverified accounts may not write
        //
        let cred = identity.verify_credential(&req.credential)?;
        if !cred.email_verified {
            return Err(AppError::Auth(format!(
                "account {} has not verified its email",
                cred.user_id
            )));
        }

        //
        // 3. Insert
        //
        let rec = AttendanceRecord::new(
            &cred.user_id,
            req.venue.clone(),
            req.currently_here,
            req.planning_to_attend,
        );
        let id = insert_attendance(conn, &rec)?;

        let _ = bblog(
            conn,
            "buzz",
            &req.venue.title,
            &format!(
                "user={} here={} planning={}",
                cred.user_id, req.currently_here, req.planning_to_attend
            ),
        );

        //
        // 4. Wake the live queries. The record is already committed, so a
        //    notification failure is reported but does not undo the submit.
        //
        if let Err(e) = watchers.notify(conn, &req.venue.title) {
            warning(format!("Failed to notify watchers: {}", e));
        }

        Ok(id)
    }
}
