//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the work and scrape handlers
//! - Wrap each work route with its curried duration histogram
//! - Serve on a bound listener until shutdown is signalled
//!
//! # Routes
//! - `/metrics` (GET): exposition text
//! - `/slow` (any): slow work, handler label `slowWork`
//! - `/` and any other path (any): regular work, handler label `regularWork`

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::http::handlers;
use crate::http::middleware::instrument_duration;
use crate::observability::metrics::{MetricsRegistry, REGULAR_WORK, SLOW_WORK};
use crate::simulation::DrawSource;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Value of the `app` log field.
    pub app_name: Arc<str>,
    pub draws: Arc<dyn DrawSource>,
    pub registry: MetricsRegistry,
}

/// HTTP server for the simulated workload.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server. Duration series must already be registered.
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        let durations = state.registry.request_duration();

        let regular: MethodRouter<AppState> = any(handlers::regular_work).layer(
            middleware::from_fn_with_state(durations.curry(REGULAR_WORK), instrument_duration),
        );
        let slow: MethodRouter<AppState> = any(handlers::slow_work).layer(
            middleware::from_fn_with_state(durations.curry(SLOW_WORK), instrument_duration),
        );

        Router::new()
            .route("/metrics", get(handlers::metrics))
            .route("/slow", slow)
            .route("/", regular.clone())
            .route("/{*path}", regular)
            .with_state(state)
    }

    /// The router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::debug!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::debug!("HTTP server stopped");
        Ok(())
    }
}
