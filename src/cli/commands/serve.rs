use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reminder::ReminderLogic;
use crate::core::reset::ResetLogic;
use crate::core::scheduler::{DailySchedule, Scheduler};
use crate::core::watch::WatchRegistry;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::providers::ConsolePushGateway;
use crate::ui::messages::info;
use chrono::Utc;

/// Run the scheduler daemon: the daily reset and the weekend reminder, each
/// at its configured civil time. Blocks until the process is terminated.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Serve) {
        let (mut scheduler, _handle) = Scheduler::new();

        //
        // 1. Daily reset at reset_time in the configured zone
        //
        let reset_schedule =
            DailySchedule::parse(&cfg.reset_time, &cfg.time_zone, None)?;
        let db_path = cfg.database.clone();
        scheduler.add_job("daily-reset", Box::new(reset_schedule), move || {
            let mut pool = DbPool::new(&db_path)?;
            let watchers = WatchRegistry::new();
            ResetLogic::apply(&mut pool, &watchers, Utc::now())?;
            Ok(())
        });

        //
        // 2. Weekend reminder at reminder_time on reminder_days
        //
        let reminder_schedule = DailySchedule::parse(
            &cfg.reminder_time,
            &cfg.time_zone,
            Some(&cfg.reminder_days),
        )?;
        let db_path = cfg.database.clone();
        let chunk_size = cfg.push_chunk_size;
        scheduler.add_job("weekend-reminder", Box::new(reminder_schedule), move || {
            let pool = DbPool::new(&db_path)?;
            ReminderLogic::apply(&pool.conn, &ConsolePushGateway, chunk_size)?;
            Ok(())
        });

        info(format!(
            "Scheduler running: reset daily at {} {}, reminder at {} on {} — Ctrl-C to stop.",
            cfg.reset_time, cfg.time_zone, cfg.reminder_time, cfg.reminder_days
        ));

        scheduler.run();
    }

    Ok(())
}
