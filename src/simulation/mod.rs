//! Request simulation subsystem.
//!
//! # Data Flow
//! ```text
//! DrawSource (thread RNG, seeded RNG, fixed)
//!     → policy.rs (draw → delay, status, payload)
//!     → handler sleeps for the delay and writes the payload
//! ```

pub mod policy;
pub mod source;

pub use policy::{Policy, SimulationOutcome};
pub use source::{DrawSource, FixedDraw, SeededSource, ThreadRngSource};
