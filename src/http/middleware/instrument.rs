//! Request duration instrumentation.
//!
//! Wraps a route with a `HandlerHistogram` whose handler label was bound
//! when the router was built. The status code comes from the response the
//! inner handler produced, so the observed code is the one sent to the caller.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

use crate::observability::metrics::HandlerHistogram;

/// Time the inner handler and observe the elapsed seconds under
/// (handler label, response status).
///
/// A panicking handler unwinds through here and records nothing.
pub async fn instrument_duration(
    State(histogram): State<HandlerHistogram>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let response = next.run(request).await;
    histogram.observe(response.status(), started.elapsed());
    response
}
