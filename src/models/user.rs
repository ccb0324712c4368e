use serde::Serialize;

/// A user profile row.
///
/// `email_verified` is the hard gate for writing attendance: unverified
/// accounts can sign in but cannot buzz.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
    pub push_token: String, // empty when the user never registered a device
    pub created_at: String,
}
