//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;
use std::time::Duration;
use url::Url;

use crate::constants;

/// TCP port that cannot be zero
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port(NonZeroU16);

impl Port {
    /// Create a new port, returning None if value is 0
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        match NonZeroU16::new(value) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn get(&self) -> u16 {
        self.0.get()
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::new(constants::http::DEFAULT_PORT).expect("default port is non-zero")
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl Serialize for Port {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.get())
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u16::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| serde::de::Error::custom("port cannot be 0"))
    }
}

/// Serialize/deserialize a `Duration` as integer milliseconds
pub mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Main proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Listen address settings
    pub server: ServerConfig,
    /// Upstream source settings
    pub upstream: UpstreamConfig,
    /// Freshness cache settings
    pub cache: CacheConfig,
}

/// Listen address settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host/IP to bind to (default: 0.0.0.0)
    pub host: String,
    /// Port to listen on (default: 3000, overridable via `PORT`)
    pub port: Port,
}

impl ServerConfig {
    /// Default listen host (all interfaces)
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Port::default(),
        }
    }
}

/// Upstream source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// RSS feed URL fetched for `/feed`
    pub feed_url: String,
    /// Only origin `/article` and `/image` will fetch from
    pub allowed_origin: String,
    /// User-Agent sent with every upstream request
    pub user_agent: String,
    /// Base URL clients reach this proxy at, used when rewriting image links
    pub public_base_url: String,
    /// Timeout applied to every outbound request
    #[serde(with = "duration_millis")]
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            feed_url: super::defaults::feed_url(),
            allowed_origin: super::defaults::allowed_origin(),
            user_agent: super::defaults::user_agent(),
            public_base_url: super::defaults::public_base_url(),
            request_timeout: super::defaults::request_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Check whether a caller-supplied URL matches the allowed origin
    ///
    /// Compares scheme + host + port. Unparseable URLs are rejected; this is
    /// the boundary that keeps the proxy from being used as an open relay.
    #[must_use]
    pub fn is_allowed(&self, raw: &str) -> bool {
        let (Ok(target), Ok(allowed)) = (Url::parse(raw), Url::parse(&self.allowed_origin)) else {
            return false;
        };
        target.origin() == allowed.origin()
    }
}

/// Freshness cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Feed cache TTL (default: 15 minutes)
    #[serde(with = "duration_millis")]
    pub feed_ttl: Duration,
    /// Article cache TTL (default: 10 minutes)
    #[serde(with = "duration_millis")]
    pub article_ttl: Duration,
    /// Maximum number of article pages to keep
    pub article_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            feed_ttl: super::defaults::feed_ttl(),
            article_ttl: super::defaults::article_ttl(),
            article_capacity: super::defaults::article_capacity(),
        }
    }
}
