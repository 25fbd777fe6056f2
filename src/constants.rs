//! Constants used throughout the proxy
//!
//! This module centralizes magic numbers and fixed strings to reduce
//! duplication between the config defaults, handlers, and tests.

use std::time::Duration;

/// Cache freshness constants
pub mod cache {
    use super::Duration;

    /// Feed cache TTL (15 minutes)
    ///
    /// The feed changes at most a few times per day; a 15 minute window keeps
    /// the upstream request rate bounded regardless of client traffic.
    pub const FEED_TTL: Duration = Duration::from_millis(900_000);

    /// Article cache TTL (10 minutes)
    pub const ARTICLE_TTL: Duration = Duration::from_millis(600_000);

    /// Maximum number of article pages held in the LRU article cache
    ///
    /// The original drafts kept every article ever requested in memory for
    /// the process lifetime; bounding the cache closes that growth issue.
    pub const ARTICLE_CAPACITY: u64 = 1024;
}

/// HTTP server and outbound request constants
pub mod http {
    use super::Duration;

    /// Default listen port when neither `--port` nor `PORT` is set
    pub const DEFAULT_PORT: u16 = 3000;

    /// Identifying header sent with every upstream request
    pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; GrantMagBot/1.0)";

    /// Timeout applied to every outbound request
    ///
    /// Hardening over the original drafts, which would hang a client request
    /// indefinitely on a stuck upstream connection.
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

    /// Liveness string served at `/`
    pub const HEALTH_MESSAGE: &str = "GrantMag backend is running!";
}

/// Upstream source constants
pub mod upstream {
    /// Feed URL fetched for `/feed`
    pub const DEFAULT_FEED_URL: &str =
        "https://backfeed.app/jkLTDA9LpqPBIVdrjl/https://grantmagazine.com/feed/rss";

    /// Only origin the article and image endpoints will fetch from
    pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://grantmagazine.com";

    /// Base URL clients reach this proxy at, used when rewriting image links
    pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
}
