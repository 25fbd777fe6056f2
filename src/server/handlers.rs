//! Request handlers for each endpoint
//!
//! Each handler orchestrates fetcher, cache, and transformer:
//! check freshness, fetch on stale/absent, store, transform, serialize.
//! Refreshes run under a per-key single-flight guard so concurrent stale
//! hits collapse into one upstream fetch.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use super::AppState;
use super::error::ProxyError;
use crate::cache::{CachedPage, ttl};
use crate::constants;
use crate::feed::{self, FeedItem};
use crate::transform;

/// Single-flight key for the feed; the feed URL is constant so one key is
/// enough
const FEED_KEY: &str = "feed";

/// Query shape shared by the URL-taking endpoints
///
/// `url` is optional here so the handler can answer a missing parameter
/// with a 400 instead of axum's extractor rejection.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[derive(Serialize)]
struct FeedResponse<'a> {
    items: &'a [FeedItem],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeaturedImageResponse {
    featured_image: Option<String>,
}

/// GET `/` - constant liveness string
pub async fn health() -> &'static str {
    constants::http::HEALTH_MESSAGE
}

/// GET `/feed` - parsed feed items, cached for the feed TTL window
///
/// On fetch or parse failure the client gets a 500 with an empty item list,
/// never an unhandled fault.
pub async fn feed(State(state): State<Arc<AppState>>) -> Response {
    if let Some(items) = state.feed_cache.fresh_at(ttl::now_millis()).await {
        return feed_response(&items);
    }

    let _flight = state.flights.acquire(FEED_KEY).await;
    // Re-check: a concurrent request may have refreshed while we waited
    if let Some(items) = state.feed_cache.fresh_at(ttl::now_millis()).await {
        return feed_response(&items);
    }

    match refresh_feed(&state).await {
        Ok(items) => feed_response(&items),
        Err(err) => {
            error!("feed refresh failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FeedResponse { items: &[] }),
            )
                .into_response()
        }
    }
}

async fn refresh_feed(state: &AppState) -> Result<Arc<Vec<FeedItem>>, ProxyError> {
    let xml = state
        .fetcher
        .fetch_text(&state.config.upstream.feed_url)
        .await?;
    let items = Arc::new(feed::parse_feed(&xml)?);
    state
        .feed_cache
        .store(Arc::clone(&items), ttl::now_millis())
        .await;
    debug!("feed cache refreshed with {} items", items.len());
    Ok(items)
}

fn feed_response(items: &[FeedItem]) -> Response {
    Json(FeedResponse { items }).into_response()
}

/// GET `/article?url=` - article HTML with image links rewritten
///
/// Requires `url`; rejects origins other than the configured one before any
/// fetch. Pages are cached per URL for the article TTL window with the
/// rewrite already applied.
pub async fn article(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Result<Response, ProxyError> {
    let url = query.url.ok_or(ProxyError::MissingParam("url"))?;
    if !state.config.upstream.is_allowed(&url) {
        return Err(ProxyError::ForbiddenOrigin(url));
    }

    if let Some(page) = state.article_cache.get(&url).await {
        return Ok(Html(page.html().to_string()).into_response());
    }

    let _flight = state.flights.acquire(&url).await;
    if let Some(page) = state.article_cache.get(&url).await {
        return Ok(Html(page.html().to_string()).into_response());
    }

    let raw = state.fetcher.fetch_text(&url).await?;
    let rewritten = transform::rewrite_all_images(&raw, &state.config.upstream.public_base_url);
    state
        .article_cache
        .insert(&url, CachedPage::new(rewritten.clone()))
        .await;
    debug!("article cache refreshed for {url}");

    Ok(Html(rewritten).into_response())
}

/// GET `/featured-image?url=` - one representative image URL, uncached
///
/// Requires `url`. Fetch and extraction failures both yield a null value
/// rather than an error response, matching the scrape-and-shrug behavior
/// the clients were built against.
pub async fn featured_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<impl Serialize>, ProxyError> {
    let url = query.url.ok_or(ProxyError::MissingParam("url"))?;

    let featured_image = match state.fetcher.fetch_text(&url).await {
        Ok(html) => transform::extract_featured_image(&html),
        Err(err) => {
            error!("image scrape failed for {url}: {err}");
            None
        }
    };

    Ok(Json(FeaturedImageResponse { featured_image }))
}

/// GET `/image?url=` - relay image bytes with content-type passthrough
///
/// The endpoint the rewritten article HTML points at. Same origin rules as
/// `/article`; an upstream failure maps to 502 with an empty body.
pub async fn image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Result<Response, ProxyError> {
    let url = query.url.ok_or(ProxyError::MissingParam("url"))?;
    if !state.config.upstream.is_allowed(&url) {
        return Err(ProxyError::ForbiddenOrigin(url));
    }

    match state.fetcher.fetch_image(&url).await {
        Ok(img) => {
            let mut response = img.body.into_response();
            if let Some(ct) = img.content_type {
                if let Ok(value) = header::HeaderValue::from_str(&ct) {
                    response.headers_mut().insert(header::CONTENT_TYPE, value);
                }
            }
            Ok(response)
        }
        Err(err) => {
            error!("image relay failed for {url}: {err}");
            Ok(StatusCode::BAD_GATEWAY.into_response())
        }
    }
}
