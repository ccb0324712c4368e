//! Push-based live subscriptions over the attendance store.
//!
//! Watches come in two shapes: per-(venue, flag) record sets, matching what
//! the detail view renders, and per-venue combined counts, which the list
//! view uses so it no longer needs two subscriptions per bar. Each committed
//! write re-runs the relevant query and hands every matching subscriber the
//! full fresh result, without debouncing. Subscriptions are independent of
//! each other; dropping a handle releases its subscription.

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceRecord, Flag, VenueCounts};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type RecordsCallback = Box<dyn Fn(&[AttendanceRecord]) + Send>;
type CountsCallback = Box<dyn Fn(&VenueCounts) + Send>;

struct FlagWatcher {
    venue_title: String,
    flag: Flag,
    callback: RecordsCallback,
}

struct CountsWatcher {
    venue_title: String,
    callback: CountsCallback,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    flag_watchers: HashMap<u64, FlagWatcher>,
    counts_watchers: HashMap<u64, CountsWatcher>,
}

#[derive(Clone, Default)]
pub struct WatchRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to the record set of one (venue, flag) filter.
    pub fn watch(
        &self,
        venue_title: &str,
        flag: Flag,
        callback: impl Fn(&[AttendanceRecord]) + Send + 'static,
    ) -> WatchHandle {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.flag_watchers.insert(
            id,
            FlagWatcher {
                venue_title: venue_title.to_string(),
                flag,
                callback: Box::new(callback),
            },
        );
        WatchHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe to the combined counts of one venue.
    pub fn watch_counts(
        &self,
        venue_title: &str,
        callback: impl Fn(&VenueCounts) + Send + 'static,
    ) -> WatchHandle {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.counts_watchers.insert(
            id,
            CountsWatcher {
                venue_title: venue_title.to_string(),
                callback: Box::new(callback),
            },
        );
        WatchHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver fresh results to every subscription the given venue could
    /// affect. Callbacks run under the registry lock and must not subscribe
    /// or cancel from inside.
    pub fn notify(&self, conn: &Connection, venue_title: &str) -> AppResult<()> {
        let inner = self.lock();

        // One counts query feeds every counts watcher of this venue.
        let mut counts: Option<VenueCounts> = None;
        for w in inner
            .counts_watchers
            .values()
            .filter(|w| w.venue_title == venue_title)
        {
            if counts.is_none() {
                counts = Some(queries::venue_counts(conn, venue_title)?);
            }
            if let Some(c) = &counts {
                (w.callback)(c);
            }
        }

        // One list query per flag actually watched.
        let mut here: Option<Vec<AttendanceRecord>> = None;
        let mut planning: Option<Vec<AttendanceRecord>> = None;
        for w in inner
            .flag_watchers
            .values()
            .filter(|w| w.venue_title == venue_title)
        {
            let cache = match w.flag {
                Flag::CurrentlyHere => &mut here,
                Flag::PlanningToAttend => &mut planning,
            };
            if cache.is_none() {
                *cache = Some(queries::list_by_venue_and_flag(conn, venue_title, w.flag)?);
            }
            if let Some(records) = cache {
                (w.callback)(records);
            }
        }

        Ok(())
    }

    pub fn active_watches(&self) -> usize {
        let inner = self.lock();
        inner.flag_watchers.len() + inner.counts_watchers.len()
    }
}

/// Owner token for one subscription. Dropping it stops delivery.
pub struct WatchHandle {
    id: u64,
    registry: Weak<Mutex<Inner>>,
}

impl WatchHandle {
    pub fn cancel(self) {
        // Drop does the actual work.
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.flag_watchers.remove(&self.id);
            inner.counts_watchers.remove(&self.id);
        }
    }
}
