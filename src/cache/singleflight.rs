//! Per-key in-flight refresh de-duplication
//!
//! The freshness check and the fetch-and-store that follows it are separated
//! by an await point, so two requests arriving while a key is stale would
//! both observe "stale" and both hit the upstream. Holding a per-key guard
//! across the refresh collapses those into a single upstream fetch: the
//! second request re-checks the cache after acquiring the guard and finds
//! the entry the first one stored.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of per-key refresh locks
///
/// Entries are created on demand and removed once the last interested
/// request releases its guard, so the map only holds keys with an active or
/// contended refresh.
#[derive(Debug, Default, Clone)]
pub struct SingleFlight {
    inflight: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the refresh guard for `key`, waiting if another request holds it
    ///
    /// Callers must re-check the cache after acquisition: if a concurrent
    /// request already refreshed the key, the cache now holds a fresh entry
    /// and no upstream fetch is needed.
    pub async fn acquire(&self, key: &str) -> FlightGuard {
        let lock = self
            .inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        FlightGuard {
            inflight: Arc::clone(&self.inflight),
            key: key.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of keys with an active or contended refresh
    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }
}

/// Guard held for the duration of one refresh attempt
///
/// Dropping the guard releases the key's lock and removes the map entry if
/// no other request is waiting on it.
pub struct FlightGuard {
    inflight: Arc<DashMap<String, Arc<Mutex<()>>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        // Release the mutex first so waiters counted below are only ones
        // still holding an Arc clone from acquire().
        self.guard.take();
        self.inflight
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
