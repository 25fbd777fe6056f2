//! Configuration validation
//!
//! Checks semantic constraints the type system cannot express before the
//! proxy starts serving.

use anyhow::Result;
use std::time::Duration;
use url::Url;

use super::types::Config;

/// TTLs below this almost certainly defeat the point of caching
const MIN_RECOMMENDED_TTL: Duration = Duration::from_secs(1);

impl Config {
    /// Validate configuration for correctness
    ///
    /// Port validity is already enforced by the `Port` type. This checks:
    /// - feed URL and public base URL are non-empty, parseable URLs
    /// - allowed origin parses and has a host to compare against
    /// - article cache capacity is non-zero
    ///
    /// Suspiciously small TTLs are warned about but not rejected.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.feed_url.trim().is_empty() {
            return Err(anyhow::anyhow!("upstream.feed_url must not be empty"));
        }
        Url::parse(&self.upstream.feed_url)
            .map_err(|e| anyhow::anyhow!("upstream.feed_url is not a valid URL: {}", e))?;

        let origin = Url::parse(&self.upstream.allowed_origin)
            .map_err(|e| anyhow::anyhow!("upstream.allowed_origin is not a valid URL: {}", e))?;
        if origin.host_str().is_none() {
            return Err(anyhow::anyhow!(
                "upstream.allowed_origin '{}' has no host to match against",
                self.upstream.allowed_origin
            ));
        }

        Url::parse(&self.upstream.public_base_url)
            .map_err(|e| anyhow::anyhow!("upstream.public_base_url is not a valid URL: {}", e))?;

        if self.cache.article_capacity == 0 {
            return Err(anyhow::anyhow!(
                "cache.article_capacity must be at least 1"
            ));
        }

        for (name, ttl) in [
            ("cache.feed_ttl", self.cache.feed_ttl),
            ("cache.article_ttl", self.cache.article_ttl),
        ] {
            if ttl < MIN_RECOMMENDED_TTL {
                tracing::warn!(
                    "{} is {:?} (< {:?}); nearly every request will hit the upstream",
                    name,
                    ttl,
                    MIN_RECOMMENDED_TTL
                );
            }
        }

        Ok(())
    }
}
