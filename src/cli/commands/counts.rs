use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::counts::CountsLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::venue;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET};

/// Show per-venue counts: currently here, planning to attend, and the
/// total the app displays (the plain sum of the two).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Counts {
        venue: filter,
        json,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        let titles: Vec<String> = match filter {
            Some(title) => vec![
                venue::find(title)
                    .map(|v| v.title)
                    .unwrap_or_else(|| title.trim().to_string()),
            ],
            None => venue::catalog().into_iter().map(|v| v.title).collect(),
        };

        // ---- JSON OUTPUT ----
        if *json {
            let mut rows = Vec::new();
            for title in &titles {
                let counts = CountsLogic::venue(&pool.conn, title)?;
                rows.push(serde_json::json!({
                    "venue": title,
                    "currently_here": counts.currently_here,
                    "planning_to_attend": counts.planning_to_attend,
                    "total": counts.total(),
                }));
            }
            println!("{}", serde_json::to_string_pretty(&rows).unwrap());
            return Ok(());
        }

        // ---- TABLE OUTPUT ----
        println!("🍺 Tonight's counts:\n");

        let width = titles.iter().map(|t| t.len()).max().unwrap_or(10);

        for title in titles {
            let counts = CountsLogic::venue(&pool.conn, &title)?;
            let total_color = if counts.total() > 0 { GREEN } else { GREY };
            println!(
                "{:<width$} | {}here {:>3}{} | {}planning {:>3}{} | {}{} people{}",
                title,
                CYAN,
                counts.currently_here,
                RESET,
                CYAN,
                counts.planning_to_attend,
                RESET,
                total_color,
                counts.total(),
                RESET,
                width = width
            );
        }
    }

    Ok(())
}
