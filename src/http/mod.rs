//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, graceful shutdown)
//!     → middleware/instrument.rs (start timer)
//!     → handlers.rs (request.rs context, simulate, sleep, respond, log)
//!     → middleware/instrument.rs (observe duration by handler + code)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
