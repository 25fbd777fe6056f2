//! Request error types and their HTTP status mapping
//!
//! Taxonomy: client input errors (400), authorization errors (403), and
//! upstream failures (500/502). None of these escalate past the request;
//! every failure becomes a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::fetch::FetchError;

/// Errors a request handler can answer a client with
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required query parameter was not supplied
    #[error("missing required query parameter `{0}`")]
    MissingParam(&'static str),

    /// The requested URL's origin is not the allowed origin
    #[error("origin not allowed: {0}")]
    ForbiddenOrigin(String),

    /// The upstream fetch failed; the client gets a server error with an
    /// empty body rather than an unhandled fault
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Fetched feed text was not a parseable RSS channel
    #[error("feed parse error: {0}")]
    FeedParse(#[from] rss::Error),
}

impl ProxyError {
    /// Status code this error maps to
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParam(_) => StatusCode::BAD_REQUEST,
            Self::ForbiddenOrigin(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) | Self::FeedParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::MissingParam(param) => {
                (status, format!("missing query parameter `{param}`")).into_response()
            }
            Self::ForbiddenOrigin(url) => {
                (status, format!("origin not allowed: {url}")).into_response()
            }
            Self::Upstream(err) => {
                error!("upstream failure: {err}");
                (status, String::new()).into_response()
            }
            Self::FeedParse(err) => {
                error!("feed parse failure: {err}");
                (status, String::new()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ProxyError::MissingParam("url").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::ForbiddenOrigin("https://evil.example/".into()).status(),
            StatusCode::FORBIDDEN
        );

        let upstream = ProxyError::Upstream(FetchError::Status {
            url: "https://x/".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        });
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
