//! Article page caching using an LRU cache with TTL
//!
//! Keyed by the requested article URL. Unlike the feed cache, this store is
//! bounded: the original drafts kept every distinct URL ever requested in
//! memory for the process lifetime, so the reimplementation caps the entry
//! count and lets moka evict least-recently-used pages.

use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::ttl;

/// Cached article page
///
/// Stores the fully transformed HTML (image links already rewritten), so a
/// cache hit is served without re-running the transformer.
#[derive(Clone, Debug)]
pub struct CachedPage {
    html: Arc<str>,
    /// Milliseconds since Unix epoch at the time of the successful fetch
    fetched_at: u64,
}

impl CachedPage {
    pub fn new(html: String) -> Self {
        Self {
            html: html.into(),
            fetched_at: ttl::now_millis(),
        }
    }

    /// Rewritten HTML ready to serve
    #[inline]
    pub fn html(&self) -> &Arc<str> {
        &self.html
    }

    /// When this page was fetched (milliseconds since epoch)
    #[inline]
    pub fn fetched_at(&self) -> u64 {
        self.fetched_at
    }
}

/// Per-URL article cache with LRU eviction and a fixed TTL
///
/// Uses `Arc<str>` keys so lookups borrow the URL without allocating.
#[derive(Clone, Debug)]
pub struct ArticleCache {
    cache: Arc<Cache<Arc<str>, CachedPage>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    capacity: u64,
}

impl ArticleCache {
    /// Create a new article cache
    ///
    /// # Arguments
    /// * `max_capacity` - maximum number of pages to keep
    /// * `ttl` - time-to-live for cached pages
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            cache: Arc::new(cache),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            capacity: max_capacity,
        }
    }

    /// Look up a page by URL
    ///
    /// Zero-allocation: `Arc<str>` keys support `Borrow<str>` lookups.
    pub async fn get(&self, url: &str) -> Option<CachedPage> {
        let result = self.cache.get(url).await;
        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Insert a page, overwriting any existing entry for the URL
    pub async fn insert(&self, url: &str, page: CachedPage) {
        let key: Arc<str> = url.into();
        self.cache.insert(key, page).await;
    }

    /// Maximum number of pages this cache will hold
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Current number of cached pages
    #[inline]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
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

    /// Run pending background tasks (for testing)
    ///
    /// Moka performs eviction and expiration asynchronously; tests call this
    /// to make those effects observable deterministically.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}
