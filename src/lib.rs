//! Caching HTTP proxy for the GrantMag RSS feed and article pages
//!
//! The proxy sits between a browser client and the upstream magazine site.
//! It fetches the RSS feed and individual article pages on the client's
//! behalf, applies short-lived time-based caching to reduce upstream load,
//! and rewrites embedded image URLs so they route back through the proxy.
//!
//! ## Architecture
//!
//! - [`fetch`] - outbound HTTP with a fixed identifying User-Agent
//! - [`cache`] - freshness caches (single-slot feed cache, keyed LRU article
//!   cache) plus single-flight refresh de-duplication
//! - [`transform`] - image URL rewriting and featured-image extraction
//! - [`feed`] - RSS parsing into the item shape served to clients
//! - [`server`] - axum router, request handlers, and error mapping
//! - [`config`] - TOML + environment configuration

pub mod cache;
pub mod config;
pub mod constants;
pub mod feed;
pub mod fetch;
pub mod logging;
pub mod server;
pub mod transform;

pub use cache::{ArticleCache, FeedCache, SingleFlight};
pub use config::{Config, create_default_config, load_config};
pub use fetch::{FetchError, HttpFetcher, UpstreamFetcher};
pub use server::{AppState, router};
