//! serviceb: a simulated downstream service.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ instrument ──▶ regular_work (/, 1-100 ms, 25% 500)
//!                       (timer)  ──▶ slow_work    (/slow, 100-300 ms)
//!                                         │
//!                                         ▼
//!     ◀────────────── observe http_request_duration_seconds{handler, code}
//!                     log status + duration
//!
//!     GET /metrics ─▶ program_info, http_request_duration_seconds
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use serviceb::config::{load_config, ObservabilityConfig};
use serviceb::lifecycle::{bootstrap, Shutdown, StartupError};
use serviceb::observability::logging;
use serviceb::simulation::{DrawSource, SeededSource, ThreadRngSource};

#[derive(Parser)]
#[command(name = "serviceb")]
#[command(about = "Synthetic workload endpoint with latency histograms", long_about = None)]
struct Cli {
    /// Optional TOML config file. `PORT` still overrides the port.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the draw source for a reproducible latency sequence.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());
    let observability = loaded
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    if let Err(e) = logging::init(&observability) {
        eprintln!("failed to initialize logging: {e}");
    }

    if let Err(e) = run(loaded.map_err(StartupError::from), cli.seed).await {
        tracing::error!(app = "serviceb", "Errored with: {}", e);
        std::process::exit(1);
    }
}

async fn run(
    config: Result<serviceb::ServiceConfig, StartupError>,
    seed: Option<u64>,
) -> Result<(), StartupError> {
    let config = config?;

    let draws: Arc<dyn DrawSource> = match seed {
        Some(seed) => Arc::new(SeededSource::new(seed)),
        None => Arc::new(ThreadRngSource),
    };

    let service = bootstrap(config, draws)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    service.serve(shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
