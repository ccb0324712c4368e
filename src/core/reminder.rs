use crate::db::log::bblog;
use crate::db::users;
use crate::errors::AppResult;
use crate::providers::{PushGateway, PushMessage};
use crate::ui::messages::{info, success};
use rusqlite::Connection;

/// Outcome of one reminder run.
#[derive(Debug, Clone, Copy)]
pub struct ReminderReport {
    pub delivered: usize,
    pub rejected: usize,
    pub skipped: usize,
}

/// True for device tokens in Expo's `ExponentPushToken[...]` shape.
fn is_expo_push_token(token: &str) -> bool {
    token.starts_with("ExponentPushToken[") && token.ends_with(']')
}

/// The weekend "where are you going tonight?" push.
pub struct ReminderLogic;

impl ReminderLogic {
    /// Send the reminder to every profile with a valid device token.
    ///
    /// Tokens that do not look like Expo tokens are skipped up front, the
    /// rest go out in gateway-sized chunks. An empty token set is a logged
    /// no-op, not an error.
    pub fn apply(
        conn: &Connection,
        gateway: &dyn PushGateway,
        chunk_size: usize,
    ) -> AppResult<ReminderReport> {
        let profiles = users::list_profiles(conn)?;

        let mut skipped = 0usize;
        let mut messages = Vec::new();
        for p in profiles {
            if is_expo_push_token(&p.push_token) {
                messages.push(PushMessage {
                    to: p.push_token.clone(),
                    title: "Time to Buzz In!".to_string(),
                    body: "Where are you going tonight? Tap to let us know!".to_string(),
                });
            } else if !p.push_token.is_empty() {
                skipped += 1;
            }
        }

        if messages.is_empty() {
            info("No valid push tokens found.");
            return Ok(ReminderReport {
                delivered: 0,
                rejected: 0,
                skipped,
            });
        }

        let mut delivered = 0usize;
        let mut rejected = 0usize;
        for chunk in messages.chunks(chunk_size.max(1)) {
            for delivery in gateway.send_push(chunk)? {
                if delivery.accepted {
                    delivered += 1;
                } else {
                    rejected += 1;
                }
            }
        }

        let _ = bblog(
            conn,
            "remind",
            "weekend",
            &format!("delivered {} push notification(s)", delivered),
        );
        success(format!("Weekend reminder sent to {} device(s).", delivered));

        Ok(ReminderReport {
            delivered,
            rejected,
            skipped,
        })
    }
}
