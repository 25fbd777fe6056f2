//! Outbound fetching from the upstream site
//!
//! Every upstream request carries the fixed identifying User-Agent and a
//! request timeout. The fetcher does not retry and does not distinguish
//! 4xx from 5xx beyond "not a success"; any failure is surfaced to the
//! handler, which decides how to answer the client.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by an upstream fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, or timeout failure before a response arrived
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be read or decoded
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Image bytes relayed through the `/image` endpoint
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub body: Vec<u8>,
    /// Upstream `Content-Type`, passed through to the client when present
    pub content_type: Option<String>,
}

/// Outbound GET against the feed URL or a caller-supplied page URL
///
/// Behind a trait so request handlers can be exercised against a scripted
/// fetcher in tests without a network.
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// Fetch a URL and return the response body as text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a URL and return raw bytes plus the upstream content type
    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// Production fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the identifying User-Agent and request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl UpstreamFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        Ok(FetchedImage { body, content_type })
    }
}

/// Scripted fetcher for tests
///
/// Serves canned responses keyed by URL and counts how often each URL was
/// requested, which is what the cache-hit invariants assert on. URLs with no
/// scripted response fail with a synthetic 500.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: dashmap::DashMap<String, String>,
    images: dashmap::DashMap<String, FetchedImage>,
    calls: dashmap::DashMap<String, u64>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a text response for a URL
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Script an image response for a URL
    pub fn with_image(self, url: &str, body: &[u8], content_type: &str) -> Self {
        self.images.insert(
            url.to_string(),
            FetchedImage {
                body: body.to_vec(),
                content_type: Some(content_type.to_string()),
            },
        );
        self
    }

    /// Replace the scripted text response for a URL after construction
    pub fn set_page(&self, url: &str, body: &str) {
        self.pages.insert(url.to_string(), body.to_string());
    }

    /// Remove the scripted response so subsequent fetches fail
    pub fn fail_url(&self, url: &str) {
        self.pages.remove(url);
        self.images.remove(url);
    }

    /// Number of fetches issued for a URL
    pub fn calls(&self, url: &str) -> u64 {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }

    fn record(&self, url: &str) {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;
    }

    fn failure(url: &str) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl UpstreamFetcher for ScriptedFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.record(url);
        self.pages
            .get(url)
            .map(|body| body.value().clone())
            .ok_or_else(|| Self::failure(url))
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, FetchError> {
        self.record(url);
        self.images
            .get(url)
            .map(|img| img.value().clone())
            .ok_or_else(|| Self::failure(url))
    }
}
