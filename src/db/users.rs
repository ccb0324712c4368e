use crate::errors::{AppError, AppResult};
use crate::models::user::Profile;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_profile_row(row: &Row) -> Result<Profile> {
    Ok(Profile {
        id: row.get("id")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        email_verified: row.get::<_, i64>("email_verified")? == 1,
        push_token: row.get("push_token")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_profile(conn: &Connection, profile: &Profile) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (id, email, display_name, email_verified, push_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            profile.id,
            profile.email,
            profile.display_name,
            if profile.email_verified { 1 } else { 0 },
            profile.push_token,
            profile.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, user_id: &str) -> AppResult<Option<Profile>> {
    let profile = conn
        .query_row(
            "SELECT * FROM users WHERE id = ?1",
            [user_id],
            map_profile_row,
        )
        .optional()?;
    Ok(profile)
}

pub fn find_by_email(conn: &Connection, email: &str) -> AppResult<Option<Profile>> {
    let profile = conn
        .query_row(
            "SELECT * FROM users WHERE email = ?1",
            [email],
            map_profile_row,
        )
        .optional()?;
    Ok(profile)
}

/// Flip the verification gate after a successful OTP check.
pub fn set_verified_by_email(conn: &Connection, email: &str) -> AppResult<()> {
    let changed = conn.execute("UPDATE users SET email_verified = 1 WHERE email = ?1", [email])?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("no user with email {}", email)));
    }
    Ok(())
}

pub fn set_push_token(conn: &Connection, user_id: &str, token: &str) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE users SET push_token = ?2 WHERE id = ?1",
        params![user_id, token],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("no user with id {}", user_id)));
    }
    Ok(())
}

pub fn list_profiles(conn: &Connection) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare("SELECT * FROM users ORDER BY created_at ASC")?;
    let rows = stmt.query_map([], map_profile_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
