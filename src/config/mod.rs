//! Configuration module
//!
//! Handles configuration types, defaults, loading, and validation for the
//! proxy.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{create_default_config, load_config};
pub use types::{
    CacheConfig, Config, Port, ServerConfig, UpstreamConfig, duration_millis,
};
