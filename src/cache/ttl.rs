//! Wall-clock TTL helpers
//!
//! Freshness is a pure function of the wall clock at check time versus the
//! timestamp stored when the entry was fetched. There is no upstream
//! invalidation signal (no ETag / Last-Modified negotiation); staleness is
//! purely time-based.

use std::time::Duration;

/// Get current timestamp in milliseconds since Unix epoch
#[inline]
#[must_use]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Check whether a cached value has outlived its TTL
///
/// An entry is fresh iff `now - fetched_at < ttl`; equality means expired.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use grantmag_proxy::cache::ttl::is_expired;
///
/// assert!(!is_expired(5_000, 6_000, Duration::from_millis(2_000)));
/// assert!(is_expired(5_000, 8_000, Duration::from_millis(2_000)));
/// assert!(is_expired(5_000, 7_000, Duration::from_millis(2_000))); // boundary
/// ```
#[inline]
#[must_use]
pub fn is_expired(fetched_at_millis: u64, now_millis: u64, ttl: Duration) -> bool {
    let elapsed = now_millis.saturating_sub(fetched_at_millis);
    elapsed >= ttl.as_millis() as u64
}
