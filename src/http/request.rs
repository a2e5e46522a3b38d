//! Request context extraction.
//!
//! # Responsibilities
//! - Read the caller's correlation identifier (`X-Request-ID`)
//! - Capture method, request target and start instant for logging
//!
//! # Design Decisions
//! - A missing or non-UTF-8 `X-Request-ID` becomes an empty string, never an error
//! - The identifier is forwarded into logs only; it is not validated or echoed back

use axum::http::{HeaderMap, Method, Uri};
use tokio::time::Instant;
use tracing::Span;

/// Correlation header read from inbound requests.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-request facts shared by the handler and its log lines.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    /// Full request target, query string included.
    pub path: String,
    pub started: Instant,
}

impl RequestContext {
    pub fn new(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            request_id: request_id(headers),
            method: method.clone(),
            path: uri.to_string(),
            started: Instant::now(),
        }
    }

    /// Span carrying the request fields. `s` is recorded later when the
    /// handler logs its draw.
    pub fn span(&self, app: &str) -> Span {
        tracing::info_span!(
            "request",
            app = %app,
            method = %self.method,
            path = %self.path,
            request_id = %self.request_id,
            s = tracing::field::Empty,
        )
    }
}

/// The caller-supplied correlation identifier, or `""` when absent.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
