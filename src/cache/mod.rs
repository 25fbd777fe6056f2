//! Freshness caching
//!
//! This module provides the time-windowed fetch caches:
//! - Feed caching (single slot, the feed URL is constant)
//! - Article page caching (keyed by URL, LRU-bounded)
//! - Single-flight guards so concurrent stale hits share one refresh

mod article;
mod feed;
mod singleflight;
pub mod ttl;

pub use article::{ArticleCache, CachedPage};
pub use feed::{CacheEntry, FeedCache};
pub use singleflight::{FlightGuard, SingleFlight};
