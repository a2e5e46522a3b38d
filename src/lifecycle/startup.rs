//! Startup orchestration.
//!
//! # Order
//! 1. Build the metrics registry (registers `program_info` and the duration histogram)
//! 2. Set `program_info{port}` to 1
//! 3. Pre-register every (handler, code) duration series
//! 4. Build the router with the curried handlers
//! 5. Bind the listener, start metrics upkeep and serve
//!
//! Any error is fatal to the process; there is no retry.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::{AppState, HttpServer};
use crate::observability::metrics::{
    MetricsError, MetricsRegistry, REGULAR_WORK, SLOW_WORK, UPKEEP_INTERVAL,
};
use crate::simulation::DrawSource;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A fully wired service, not yet listening.
pub struct Service {
    pub config: ServiceConfig,
    pub registry: MetricsRegistry,
    pub server: HttpServer,
}

/// Register collectors and build the router.
pub fn bootstrap(
    config: ServiceConfig,
    draws: Arc<dyn DrawSource>,
) -> Result<Service, StartupError> {
    let registry = MetricsRegistry::new()?;
    registry.set_program_info(&config.port);
    registry
        .request_duration()
        .preregister(&[REGULAR_WORK, SLOW_WORK]);

    let state = AppState {
        app_name: Arc::from(config.app_name.as_str()),
        draws,
        registry: registry.clone(),
    };

    Ok(Service {
        config,
        registry,
        server: HttpServer::new(state),
    })
}

/// Bind the configured listen address.
pub async fn bind(config: &ServiceConfig) -> Result<TcpListener, StartupError> {
    let address = config.listen_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

impl Service {
    /// Bind and serve until `shutdown` fires.
    pub async fn serve(self, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        let listener = bind(&self.config).await?;
        let upkeep = self
            .registry
            .spawn_upkeep(UPKEEP_INTERVAL, shutdown.resubscribe());

        tracing::info!(
            app = %self.config.app_name,
            "Listening at: http://localhost:{}",
            self.config.port
        );

        let served = self.server.run(listener, shutdown).await;
        upkeep.abort();
        served.map_err(StartupError::Serve)
    }
}
