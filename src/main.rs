use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use grantmag_proxy::fetch::HttpFetcher;
use grantmag_proxy::{AppState, create_default_config, load_config, logging, server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides config file and PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_dual_logging();

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        load_config(&args.config)?
    } else {
        warn!(
            "Config file '{}' not found, creating default config",
            args.config
        );
        let default_config = create_default_config();
        let config_toml = toml::to_string_pretty(&default_config)?;
        std::fs::write(&args.config, &config_toml)?;
        info!("Created default config file: {}", args.config);
        default_config
    };

    if let Some(port) = args.port {
        config.server.port = grantmag_proxy::config::Port::new(port)
            .ok_or_else(|| anyhow::anyhow!("--port must be non-zero"))?;
    }
    config.validate()?;

    info!("Feed URL: {}", config.upstream.feed_url);
    info!("Allowed origin: {}", config.upstream.allowed_origin);
    info!(
        "Cache TTLs: feed {:?}, article {:?} ({} entries max)",
        config.cache.feed_ttl, config.cache.article_ttl, config.cache.article_capacity
    );

    let fetcher = Arc::new(HttpFetcher::new(
        &config.upstream.user_agent,
        config.upstream.request_timeout,
    )?);

    let listen_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, fetcher));

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("GrantMag proxy listening on {listen_addr}");

    server::serve(state, listener).await
}
