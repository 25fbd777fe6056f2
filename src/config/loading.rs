//! Configuration loading from files and environment variables
//!
//! Configuration comes from a TOML file with environment variables taking
//! precedence, so container deployments can override settings without
//! editing the file.

use anyhow::Result;

use super::types::{Config, Port};

/// Apply environment variable overrides on top of a parsed config
///
/// Recognized variables:
/// - `PORT` - listen port (matches the original deployment contract)
/// - `GRANTMAG_FEED_URL` - upstream feed URL
/// - `GRANTMAG_ALLOWED_ORIGIN` - permitted origin for article/image fetches
/// - `GRANTMAG_PUBLIC_BASE_URL` - base URL used when rewriting image links
fn apply_env_overrides(config: &mut Config) {
    if let Ok(raw) = std::env::var("PORT") {
        match raw.parse::<u16>().ok().and_then(Port::new) {
            Some(port) => {
                tracing::info!("Using listen port {} from PORT environment variable", port);
                config.server.port = port;
            }
            None => {
                tracing::warn!("Ignoring invalid PORT environment variable: {:?}", raw);
            }
        }
    }

    if let Ok(feed_url) = std::env::var("GRANTMAG_FEED_URL") {
        config.upstream.feed_url = feed_url;
    }

    if let Ok(origin) = std::env::var("GRANTMAG_ALLOWED_ORIGIN") {
        config.upstream.allowed_origin = origin;
    }

    if let Ok(base) = std::env::var("GRANTMAG_PUBLIC_BASE_URL") {
        config.upstream.public_base_url = base;
    }
}

/// Load configuration from a TOML file, with environment variable overrides
pub fn load_config(config_path: &str) -> Result<Config> {
    let config_content = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", config_path, e))?;

    let mut config: Config = toml::from_str(&config_content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", config_path, e))?;

    apply_env_overrides(&mut config);
    config.validate()?;

    Ok(config)
}

/// Create the default configuration, with environment overrides applied
///
/// Used when no config file exists yet; the caller typically writes the
/// result back out so operators have a file to edit.
#[must_use]
pub fn create_default_config() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}
