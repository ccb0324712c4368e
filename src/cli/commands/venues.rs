use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::models::venue;

/// Print the venue catalog with coordinates.
pub fn handle(cmd: &Commands) -> AppResult<()> {
    if matches!(cmd, Commands::Venues) {
        println!("📍 Venue catalog:\n");
        for v in venue::catalog() {
            println!(
                "  {:<20} ({:.4}, {:.4})",
                v.title, v.coordinates.lat, v.coordinates.lon
            );
        }
    }

    Ok(())
}
