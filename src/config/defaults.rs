//! Default values for configuration fields
//!
//! Centralizes the defaults shared by serde deserialization and the
//! generated config file so they cannot drift apart.

use crate::constants;
use std::time::Duration;

/// Default feed cache TTL (15 minutes)
#[inline]
pub fn feed_ttl() -> Duration {
    constants::cache::FEED_TTL
}

/// Default article cache TTL (10 minutes)
#[inline]
pub fn article_ttl() -> Duration {
    constants::cache::ARTICLE_TTL
}

/// Default article cache capacity (entries)
#[inline]
pub fn article_capacity() -> u64 {
    constants::cache::ARTICLE_CAPACITY
}

/// Default outbound request timeout
#[inline]
pub fn request_timeout() -> Duration {
    constants::http::FETCH_TIMEOUT
}

/// Identifying User-Agent for upstream requests
#[inline]
pub fn user_agent() -> String {
    constants::http::USER_AGENT.to_string()
}

/// Default feed URL
#[inline]
pub fn feed_url() -> String {
    constants::upstream::DEFAULT_FEED_URL.to_string()
}

/// Default allowed origin for article and image fetches
#[inline]
pub fn allowed_origin() -> String {
    constants::upstream::DEFAULT_ALLOWED_ORIGIN.to_string()
}

/// Default public base URL used when rewriting image links
#[inline]
pub fn public_base_url() -> String {
    constants::upstream::DEFAULT_PUBLIC_BASE_URL.to_string()
}
