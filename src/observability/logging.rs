//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber (plain text or JSON)
//! - Emit the per-request completion line on every exit path
//!
//! # Design Decisions
//! - Colors disabled, output is `key=value` text by default
//! - `RUST_LOG` overrides the configured filter
//! - Request fields live on a span, so every event inside the request
//!   carries `app`, `method`, `path` and `request_id`

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::Span;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Output format of the log sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let text = (config.log_format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_ansi(false));
    let json = (config.log_format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_current_span(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
}

/// Emits the request completion line when dropped.
///
/// Created when a handler starts; the handler updates the status before it
/// returns. Whatever branch the handler leaves through, exactly one
/// `status`/`duration` line is written inside the request span.
#[derive(Debug)]
pub struct CompletionLog {
    span: Span,
    started: Instant,
    status: StatusCode,
}

impl CompletionLog {
    pub fn new(span: Span, started: Instant) -> Self {
        Self {
            span,
            started,
            status: StatusCode::OK,
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }
}

impl Drop for CompletionLog {
    fn drop(&mut self) {
        let duration = self.started.elapsed().as_secs_f64();
        let status = self.status.as_u16();
        self.span.in_scope(|| tracing::info!(status, duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_completion_line_written_once_on_drop() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("request", app = "serviceb");
            let mut completion = CompletionLog::new(span, Instant::now());
            completion.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        });

        let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.lines().count(), 1, "{out}");
        assert!(out.contains("status=500"), "{out}");
        assert!(out.contains("duration="), "{out}");
        assert!(out.contains("app=\"serviceb\""), "{out}");
    }

    #[test]
    fn test_log_format_parses_lowercase() {
        let json: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(json, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
