//! Simulated work handlers and the scrape endpoint.
//!
//! Each work request runs `Simulate → Sleep → Respond → Log`. The sleep is
//! the only await point and only suspends the current request.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::http::request::RequestContext;
use crate::http::server::AppState;
use crate::observability::logging::CompletionLog;
use crate::simulation::Policy;

/// `/` and every unmatched path: 1 to 100 ms, fails a quarter of the time.
pub async fn regular_work(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    simulate(&state, Policy::Regular, RequestContext::new(&method, &uri, &headers)).await
}

/// `/slow`: 100 to 300 ms, always succeeds.
pub async fn slow_work(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    simulate(&state, Policy::Slow, RequestContext::new(&method, &uri, &headers)).await
}

async fn simulate(state: &AppState, policy: Policy, ctx: RequestContext) -> Response {
    let span = ctx.span(&state.app_name);
    let mut completion = CompletionLog::new(span.clone(), ctx.started);

    let outcome = policy.simulate(state.draws.as_ref());
    if policy.logs_draw() {
        span.record("s", outcome.draw);
    }

    tokio::time::sleep(outcome.delay).await;

    completion.set_status(outcome.status);
    if outcome.is_failure() {
        span.in_scope(|| tracing::error!("{}", outcome.payload));
    }

    (outcome.status, outcome.payload).into_response()
}

/// `/metrics`: every registered collector in the text exposition format.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.registry.render(),
    )
}
