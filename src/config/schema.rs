//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file. Every
//! field has a default so an empty file (or no file) is a valid config.

use serde::{Deserialize, Serialize};

use crate::observability::logging::LogFormat;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen port. Also the `port` label of `program_info`.
    pub port: String,

    /// Host part of the bind address.
    pub bind_host: String,

    /// Value of the `app` field on every request log line.
    pub app_name: String,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: "8081".to_string(),
            bind_host: "0.0.0.0".to_string(),
            app_name: "serviceb".to_string(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format (text, json).
    pub log_format: LogFormat,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Text,
            log_filter: "serviceb=info".to_string(),
        }
    }
}
