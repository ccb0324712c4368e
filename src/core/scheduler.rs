//! Civil-time job scheduling.
//!
//! Jobs fire at a wall-clock time in an IANA zone, optionally restricted to
//! certain weekdays. Computing the firing instant through the zone (instead
//! of a fixed UTC offset) is what keeps the schedule honest across daylight
//! saving transitions: one fire per enabled calendar day, never zero or two.

use crate::errors::AppResult;
use crate::ui::messages::{error, warning};
use crate::utils::time::{parse_hhmm, parse_weekdays, parse_zone};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration as StdDuration;

pub trait Schedule: Send {
    /// Next firing instant strictly after `after`, if any.
    fn next_run(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Fires once per enabled day at a fixed civil time in a zone.
pub struct DailySchedule {
    at: NaiveTime,
    zone: Tz,
    weekdays: Option<Vec<Weekday>>,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, zone: Tz) -> Self {
        Self {
            at,
            zone,
            weekdays: None,
        }
    }

    /// Restrict firing to the given weekdays (in the schedule's zone).
    pub fn on_days(mut self, days: Vec<Weekday>) -> Self {
        self.weekdays = Some(days);
        self
    }

    /// Build from the config-file string forms: "03:00", "America/New_York",
    /// and an optional "Fri,Sat" weekday list.
    pub fn parse(at: &str, zone: &str, days: Option<&str>) -> AppResult<Self> {
        let mut schedule = Self::new(parse_hhmm(at)?, parse_zone(zone)?);
        if let Some(d) = days {
            schedule = schedule.on_days(parse_weekdays(d)?);
        }
        Ok(schedule)
    }

    fn day_enabled(&self, day: Weekday) -> bool {
        match &self.weekdays {
            None => true,
            Some(days) => days.contains(&day),
        }
    }
}

/// Resolve a civil (date, time) in a zone to one UTC instant.
///
/// Around DST transitions a civil time can be ambiguous or nonexistent: when
/// clocks fall back the first occurrence wins, and a time erased by spring
/// forward slides to the first minute that exists again. Either way the
/// calendar day gets exactly one instant.
fn resolve_civil(zone: Tz, day: NaiveDate, at: NaiveTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&day.and_time(at)) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, _) => Some(first.with_timezone(&Utc)),
        LocalResult::None => {
            // DST gaps span at most a few hours; scan forward by the minute.
            let mut t = day.and_time(at);
            for _ in 0..240 {
                t += Duration::minutes(1);
                match zone.from_local_datetime(&t) {
                    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                        return Some(dt.with_timezone(&Utc));
                    }
                    LocalResult::None => {}
                }
            }
            None
        }
    }
}

impl Schedule for DailySchedule {
    fn next_run(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut day = after.with_timezone(&self.zone).date_naive();

        // Two weeks of candidates is enough to hit any enabled weekday.
        for _ in 0..15 {
            if self.day_enabled(day.weekday())
                && let Some(fire) = resolve_civil(self.zone, day, self.at)
                && fire > after
            {
                return Some(fire);
            }
            day = day.succ_opt()?;
        }
        None
    }
}

type JobFn = Arc<dyn Fn() -> AppResult<()> + Send + Sync>;

struct Job {
    name: String,
    schedule: Box<dyn Schedule>,
    run: JobFn,
    running: Arc<AtomicBool>,
    next: Option<DateTime<Utc>>,
}

/// Remote control for a running scheduler loop.
pub struct SchedulerHandle {
    tx: mpsc::Sender<()>,
}

impl SchedulerHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

/// Blocking driver for a set of scheduled jobs.
pub struct Scheduler {
    jobs: Vec<Job>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Scheduler {
    pub fn new() -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                jobs: Vec::new(),
                shutdown_rx: rx,
            },
            SchedulerHandle { tx },
        )
    }

    pub fn add_job(
        &mut self,
        name: &str,
        schedule: Box<dyn Schedule>,
        run: impl Fn() -> AppResult<()> + Send + Sync + 'static,
    ) {
        self.jobs.push(Job {
            name: name.to_string(),
            schedule,
            run: Arc::new(run),
            running: Arc::new(AtomicBool::new(false)),
            next: None,
        });
    }

    /// Run until the handle signals shutdown.
    ///
    /// Due jobs execute on worker threads. A tick that lands while the same
    /// job is still in flight is dropped, not queued: at 24h granularity an
    /// overlap should not happen, but a wedged run must not pile up work.
    pub fn run(mut self) {
        // Lower bound stops the loop from spinning when a schedule keeps
        // returning instants in the past.
        const MIN_SLEEP: StdDuration = StdDuration::from_millis(100);
        const MAX_SLEEP: StdDuration = StdDuration::from_secs(60);

        loop {
            let now = Utc::now();
            let mut next_check: Option<DateTime<Utc>> = None;

            for job in &mut self.jobs {
                let due = match job.next {
                    Some(t) => t,
                    None => match job.schedule.next_run(now) {
                        Some(t) => {
                            job.next = Some(t);
                            t
                        }
                        None => continue,
                    },
                };

                if due <= now {
                    job.next = job.schedule.next_run(due);

                    if job.running.swap(true, Ordering::SeqCst) {
                        warning(format!(
                            "Job '{}' is still running — tick dropped.",
                            job.name
                        ));
                    } else {
                        let run = Arc::clone(&job.run);
                        let running = Arc::clone(&job.running);
                        let name = job.name.clone();
                        thread::spawn(move || {
                            if let Err(e) = run() {
                                error(format!("Job '{}' failed: {}", name, e));
                            }
                            running.store(false, Ordering::SeqCst);
                        });
                    }
                }

                if let Some(t) = job.next {
                    next_check = Some(match next_check {
                        None => t,
                        Some(c) if t < c => t,
                        Some(c) => c,
                    });
                }
            }

            let sleep_for = match next_check {
                Some(t) => (t - now).to_std().unwrap_or(MIN_SLEEP).clamp(MIN_SLEEP, MAX_SLEEP),
                None => MAX_SLEEP,
            };

            match self.shutdown_rx.recv_timeout(sleep_for) {
                Ok(()) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    // No handle left to stop us; keep ticking on our own.
                    thread::sleep(sleep_for);
                }
            }
        }
    }
}
