//! Synthetic workload service for exercising observability tooling.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod simulation;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{bootstrap, Service, Shutdown};
