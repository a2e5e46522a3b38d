//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Work handlers produce:
//!     → logging.rs (one completion line per request, error line on failure)
//!     → metrics.rs (one duration observation per request)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → GET /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use metrics::MetricsRegistry;
