//! Time utilities: parsing HH:MM wall-clock times, weekday sets, time zones.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;

/// Parse a civil time in "HH:MM" form.
pub fn parse_hhmm(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// Parse an IANA time zone name (e.g. "America/New_York").
pub fn parse_zone(s: &str) -> AppResult<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidZone(s.to_string()))
}

/// Parse a comma-separated weekday list such as "Fri,Sat".
pub fn parse_weekdays(s: &str) -> AppResult<Vec<Weekday>> {
    let mut out = Vec::new();

    for part in s.split(',') {
        let day = match part.trim().to_lowercase().as_str() {
            "mon" | "monday" => Weekday::Mon,
            "tue" | "tuesday" => Weekday::Tue,
            "wed" | "wednesday" => Weekday::Wed,
            "thu" | "thursday" => Weekday::Thu,
            "fri" | "friday" => Weekday::Fri,
            "sat" | "saturday" => Weekday::Sat,
            "sun" | "sunday" => Weekday::Sun,
            other => return Err(AppError::InvalidWeekday(other.to_string())),
        };
        out.push(day);
    }

    Ok(out)
}
