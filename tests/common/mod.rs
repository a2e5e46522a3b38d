//! Shared utilities for integration tests.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use serviceb::simulation::DrawSource;
use serviceb::{bootstrap, Service, ServiceConfig};

/// Wire a service with the given draw source and default config.
#[allow(dead_code)]
pub fn service_with<D: DrawSource + 'static>(draws: D) -> Service {
    bootstrap(ServiceConfig::default(), Arc::new(draws)).expect("bootstrap")
}

/// Send one request through the router; returns status and body text.
#[allow(dead_code)]
pub async fn send(router: Router, path: &str, request_id: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(path);
    if let Some(id) = request_id {
        builder = builder.header("X-Request-ID", id);
    }
    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Value of the first exposition line for `name` carrying every label.
#[allow(dead_code)]
pub fn sample(exposition: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    exposition
        .lines()
        .filter(|l| !l.starts_with('#'))
        .find_map(|line| {
            let (series, value) = line.rsplit_once(' ')?;
            let (metric, rest) = series.split_once('{').unwrap_or((series, ""));
            let matched = metric == name
                && labels
                    .iter()
                    .all(|(k, v)| rest.contains(&format!("{k}=\"{v}\"")));
            if matched {
                value.parse().ok()
            } else {
                None
            }
        })
}

/// Observation count of one duration series.
#[allow(dead_code)]
pub fn duration_count(exposition: &str, handler: &str, code: &str) -> Option<f64> {
    sample(
        exposition,
        "http_request_duration_seconds_count",
        &[("handler", handler), ("code", code)],
    )
}

/// In-memory log sink for `tracing_subscriber::fmt`.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// A subscriber writing plain text into this capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(self.clone())
            .finish()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
