use serde::{Deserialize, Serialize};

/// Geographic point of a venue, kept as plain lat/lon degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A venue as submitted with an attendance record.
///
/// This is a value type, not a reference into the catalog: each record keeps
/// its own snapshot so that history stays accurate even if the catalog entry
/// is later renamed or moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub title: String,
    pub coordinates: Coordinates,
}

impl Venue {
    pub fn new(title: &str, lat: f64, lon: f64) -> Self {
        Self {
            title: title.to_string(),
            coordinates: Coordinates { lat, lon },
        }
    }
}

/// The fixed list of bars the app knows about.
///
/// Submissions are NOT validated against this list: any venue value a client
/// supplies is stored as-is. The catalog only drives the `counts` and
/// `venues` views.
pub fn catalog() -> Vec<Venue> {
    vec![
        Venue::new("Kelly's Taproom", 40.0219, -75.3312),
        Venue::new("The Grog Grill", 40.0247, -75.3286),
        Venue::new("McSorley's", 40.0145, -75.3401),
        Venue::new("Flip & Bailey's", 40.0163, -75.3352),
    ]
}

/// Case-insensitive catalog lookup, used by the CLI so users can type
/// `mcsorley's` instead of the exact title.
pub fn find(title: &str) -> Option<Venue> {
    let needle = title.trim().to_lowercase();
    catalog()
        .into_iter()
        .find(|v| v.title.to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        assert!(find("the grog grill").is_some());
        assert!(find("THE GROG GRILL").is_some());
        assert!(find("  Kelly's Taproom ").is_some());
        assert!(find("The Office").is_none());
    }

    #[test]
    fn catalog_titles_are_unique() {
        let mut titles: Vec<String> = catalog().into_iter().map(|v| v.title).collect();
        let before = titles.len();
        titles.sort();
        titles.dedup();
        assert_eq!(before, titles.len());
    }
}
