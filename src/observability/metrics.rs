//! Metrics collection and exposition.
//!
//! # Metrics
//! - `program_info` (gauge): 1, labeled with the configured `port`
//! - `http_request_duration_seconds` (histogram): handler latency by
//!   `handler` and `code`
//!
//! # Design Decisions
//! - The Prometheus recorder is owned by `MetricsRegistry`, never installed
//!   as the global recorder. Components get handles at construction time.
//! - Handler label is fixed when a `HandlerHistogram` is curried, the status
//!   code is chosen per observation.
//! - All known (handler, code) pairs are registered at startup so every
//!   series renders with a zero count before the first request.
//! - The recorder is built without an exporter, so histogram samples are
//!   drained by a periodic upkeep task rather than only on scrape.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use metrics::{Histogram, Key, Label, Level, Metadata, Recorder, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const PROGRAM_INFO: &str = "program_info";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Handler label for the regular work route.
pub const REGULAR_WORK: &str = "regularWork";
/// Handler label for the slow work route.
pub const SLOW_WORK: &str = "slowWork";

/// Every status code a handler can produce.
pub const OBSERVED_CODES: [StatusCode; 2] = [StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR];

/// How often pending histogram samples are folded into their buckets.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Covers the 0 to 300 ms simulated range in 25 ms steps.
pub const DURATION_BUCKETS: [f64; 12] = [
    0.025, 0.050, 0.075, 0.100, 0.125, 0.150, 0.175, 0.200, 0.225, 0.250, 0.275, 0.300,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to configure metrics exporter: {0}")]
    Build(#[from] BuildError),
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}

/// Process-wide collector state and its scrape handle.
#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// Build the recorder and register both collectors.
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION.to_string()),
                &DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        recorder.describe_gauge(PROGRAM_INFO.into(), None, "Info about the program.".into());
        recorder.describe_histogram(
            REQUEST_DURATION.into(),
            Some(Unit::Seconds),
            "HTTP request duration.".into(),
        );

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    /// Publish static process metadata. Called once at startup.
    pub fn set_program_info(&self, port: &str) {
        let key = Key::from_parts(PROGRAM_INFO, vec![Label::new("port", port.to_owned())]);
        self.recorder.register_gauge(&key, &metadata()).set(1.0);
    }

    /// Handle to the request duration histogram.
    pub fn request_duration(&self) -> DurationHistogram {
        DurationHistogram {
            recorder: self.recorder.clone(),
        }
    }

    /// Current state of every collector in the text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Fold pending histogram samples into their buckets.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }

    /// Run upkeep every `period` until `shutdown` fires.
    ///
    /// Without it, samples recorded between scrapes stay queued in memory.
    pub fn spawn_upkeep(
        &self,
        period: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => registry.run_upkeep(),
                    _ = shutdown.recv() => break,
                }
            }
            tracing::debug!("Metrics upkeep stopped");
        })
    }
}

/// The request duration histogram, partitioned by handler and code.
#[derive(Clone)]
pub struct DurationHistogram {
    recorder: Arc<PrometheusRecorder>,
}

impl DurationHistogram {
    /// Series for one (handler, code) pair. Registers it if missing.
    pub fn with_label_values(&self, handler: &'static str, code: StatusCode) -> Histogram {
        let key = Key::from_parts(
            REQUEST_DURATION,
            vec![
                Label::new("handler", handler),
                Label::new("code", code.as_str().to_owned()),
            ],
        );
        self.recorder.register_histogram(&key, &metadata())
    }

    /// Touch every (handler, code) pair so the series exist with a zero count.
    pub fn preregister(&self, handlers: &[&'static str]) {
        for handler in handlers {
            for code in OBSERVED_CODES {
                self.with_label_values(*handler, code);
            }
        }
    }

    /// Bind the handler label.
    pub fn curry(&self, handler: &'static str) -> HandlerHistogram {
        HandlerHistogram {
            durations: self.clone(),
            handler,
        }
    }
}

/// A duration histogram with the handler label already bound.
#[derive(Clone)]
pub struct HandlerHistogram {
    durations: DurationHistogram,
    handler: &'static str,
}

impl HandlerHistogram {
    pub fn handler(&self) -> &'static str {
        self.handler
    }

    /// Record one completed request.
    pub fn observe(&self, code: StatusCode, elapsed: Duration) {
        self.durations
            .with_label_values(self.handler, code)
            .record(elapsed.as_secs_f64());
    }
}

impl std::fmt::Debug for HandlerHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerHistogram")
            .field("handler", &self.handler)
            .finish()
    }
}
