//! Single-slot freshness cache for the feed
//!
//! The feed is fetched from one constant URL, so the store holds exactly one
//! entry which is overwritten in place on refresh and never explicitly
//! destroyed. Freshness checks take the current time as a parameter, which
//! keeps the cache deterministic under test without a mockable clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use super::ttl;

/// A cached payload plus the timestamp of its last refresh
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub payload: T,
    /// Milliseconds since Unix epoch at the time of the successful fetch
    pub fetched_at: u64,
}

/// Freshness cache holding a single entry with a fixed TTL
///
/// Cloning is cheap and all clones share the same slot.
#[derive(Debug, Clone)]
pub struct FeedCache<T> {
    slot: Arc<RwLock<Option<CacheEntry<T>>>>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<T: Clone> FeedCache<T> {
    /// Create an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the cached payload if a fresh entry exists at time `now`
    ///
    /// Returns `None` when the slot is empty or the entry's age has reached
    /// the TTL. A stale entry is left in place; it is superseded by the next
    /// [`store`](Self::store), never evicted.
    pub async fn fresh_at(&self, now: u64) -> Option<T> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) if !ttl::is_expired(entry.fetched_at, now, self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a freshly fetched payload, overwriting any existing entry
    pub async fn store(&self, payload: T, now: u64) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            payload,
            fetched_at: now,
        });
    }

    /// TTL this cache was constructed with
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(1_000);

    #[tokio::test]
    async fn empty_cache_misses() {
        let cache: FeedCache<String> = FeedCache::new(TTL);
        assert!(cache.fresh_at(1_000).await.is_none());
    }

    #[tokio::test]
    async fn stored_entry_is_fresh_within_ttl() {
        let cache = FeedCache::new(TTL);
        cache.store("payload".to_string(), 1_000).await;

        assert_eq!(cache.fresh_at(1_000).await.as_deref(), Some("payload"));
        assert_eq!(cache.fresh_at(1_999).await.as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn entry_expires_at_ttl_boundary() {
        let cache = FeedCache::new(TTL);
        cache.store("payload".to_string(), 1_000).await;

        assert!(cache.fresh_at(2_000).await.is_none());
        assert!(cache.fresh_at(5_000).await.is_none());
    }

    #[tokio::test]
    async fn store_overwrites_in_place() {
        let cache = FeedCache::new(TTL);
        cache.store("first".to_string(), 1_000).await;
        cache.store("second".to_string(), 1_500).await;

        assert_eq!(cache.fresh_at(1_600).await.as_deref(), Some("second"));
        // New fetch timestamp governs freshness
        assert_eq!(cache.fresh_at(2_400).await.as_deref(), Some("second"));
        assert!(cache.fresh_at(2_500).await.is_none());
    }

    #[tokio::test]
    async fn stale_entry_can_be_refreshed() {
        let cache = FeedCache::new(TTL);
        cache.store("old".to_string(), 1_000).await;
        assert!(cache.fresh_at(3_000).await.is_none());

        cache.store("new".to_string(), 3_000).await;
        assert_eq!(cache.fresh_at(3_500).await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let cache = FeedCache::new(TTL);
        let clone = cache.clone();
        cache.store(42u32, 1_000).await;
        assert_eq!(clone.fresh_at(1_500).await, Some(42));
    }

    #[tokio::test]
    async fn hit_rate_tracks_lookups() {
        let cache = FeedCache::new(TTL);
        assert_eq!(cache.hit_rate(), 0.0);

        cache.store(1u8, 1_000).await;
        cache.fresh_at(1_100).await; // hit
        cache.fresh_at(9_000).await; // miss
        assert!((cache.hit_rate() - 50.0).abs() < f64::EPSILON);
    }
}
