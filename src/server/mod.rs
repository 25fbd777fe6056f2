//! HTTP server: shared state, router, and serving loop

mod error;
mod handlers;

pub use error::ProxyError;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::cache::{ArticleCache, FeedCache, SingleFlight};
use crate::config::Config;
use crate::feed::FeedItem;
use crate::fetch::UpstreamFetcher;

/// Application state shared across request handlers
///
/// Constructed once at process start; the caches live here so their
/// lifecycle is bound to the process, not hidden in globals.
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn UpstreamFetcher>,
    pub feed_cache: FeedCache<Arc<Vec<FeedItem>>>,
    pub article_cache: ArticleCache,
    pub flights: SingleFlight,
}

impl AppState {
    /// Build state from a validated config and a fetcher implementation
    pub fn new(config: Config, fetcher: Arc<dyn UpstreamFetcher>) -> Self {
        let feed_cache = FeedCache::new(config.cache.feed_ttl);
        let article_cache =
            ArticleCache::new(config.cache.article_capacity, config.cache.article_ttl);

        Self {
            config: Arc::new(config),
            fetcher,
            feed_cache,
            article_cache,
            flights: SingleFlight::new(),
        }
    }
}

/// Build the router with all endpoints
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/feed", get(handlers::feed))
        .route("/article", get(handlers::article))
        .route("/featured-image", get(handlers::featured_image))
        .route("/image", get(handlers::image))
        .with_state(state)
}

/// Serve requests until a shutdown signal arrives
pub async fn serve(state: Arc<AppState>, listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
