//! Shared helpers for endpoint integration tests
//!
//! Builds a router backed by a scripted fetcher so tests can assert on
//! upstream call counts without a network.

// Each test crate pulls in the subset of helpers it needs.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use grantmag_proxy::config::Config;
use grantmag_proxy::fetch::ScriptedFetcher;
use grantmag_proxy::{AppState, router};

pub const FEED_URL: &str = "https://upstream.test/feed";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.upstream.feed_url = FEED_URL.to_string();
    config.upstream.allowed_origin = "https://grantmagazine.com".to_string();
    config.upstream.public_base_url = "http://localhost:3000".to_string();
    config
}

pub fn app_with_config(config: Config, fetcher: Arc<ScriptedFetcher>) -> Router {
    router(Arc::new(AppState::new(config, fetcher)))
}

pub fn app(fetcher: Arc<ScriptedFetcher>) -> Router {
    app_with_config(test_config(), fetcher)
}

/// Issue a GET and collect status plus UTF-8 body
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = get_raw(app, uri).await;
    (status, String::from_utf8(body).expect("utf-8 body"))
}

/// Issue a GET and collect status, headers, and raw body bytes
pub async fn get_raw(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, headers, bytes.to_vec())
}

/// Minimal two-item feed whose first title is caller-controlled
pub fn sample_feed_xml(first_title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Grant Magazine</title>
    <link>https://grantmagazine.com</link>
    <description>Student magazine</description>
    <item>
      <title>{first_title}</title>
      <link>https://grantmagazine.com/first</link>
      <category>News</category>
      <description>&lt;p&gt;teaser one&lt;/p&gt;</description>
    </item>
    <item>
      <title>Second</title>
      <link>https://grantmagazine.com/second</link>
      <description>teaser two</description>
    </item>
  </channel>
</rss>"#
    )
}
