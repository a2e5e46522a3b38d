//! Latency and outcome policies.
//!
//! # Policies
//! - `Regular`: delay of 1..=100 ms. The draw doubles as the outcome: a draw
//!   of 25 or less fails with 500, so fast responses are the failing ones.
//! - `Slow`: delay of 100..300 ms, always succeeds.

use std::time::Duration;

use axum::http::StatusCode;

use crate::simulation::source::DrawSource;

/// Body written on success by the regular handler.
pub const REGULAR_PAYLOAD: &str = "b = :-) ";

/// Body written on success by the slow handler.
pub const SLOW_PAYLOAD: &str = "b = 🐢 ";

/// Body written on a simulated failure.
pub const ERROR_PAYLOAD: &str = "OMG Error!";

/// Highest regular draw that still fails.
pub const FAILURE_CEILING: u32 = 25;

/// The simulated result of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Raw value taken from the draw source.
    pub draw: u32,
    pub delay: Duration,
    pub status: StatusCode,
    pub payload: &'static str,
}

impl SimulationOutcome {
    pub fn is_failure(&self) -> bool {
        self.status.is_server_error()
    }
}

/// Which simulation a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Regular,
    Slow,
}

impl Policy {
    /// Consume one draw from `source` and compute the outcome.
    pub fn simulate(self, source: &dyn DrawSource) -> SimulationOutcome {
        match self {
            Policy::Regular => regular_outcome(source.draw(1..101)),
            Policy::Slow => slow_outcome(source.draw(0..200)),
        }
    }

    /// Whether the raw draw is attached to the request log line.
    pub fn logs_draw(self) -> bool {
        matches!(self, Policy::Regular)
    }
}

/// Outcome of the regular policy for a draw in `1..=100`.
pub fn regular_outcome(draw: u32) -> SimulationOutcome {
    let (status, payload) = if draw <= FAILURE_CEILING {
        (StatusCode::INTERNAL_SERVER_ERROR, ERROR_PAYLOAD)
    } else {
        (StatusCode::OK, REGULAR_PAYLOAD)
    };

    SimulationOutcome {
        draw,
        delay: Duration::from_millis(u64::from(draw)),
        status,
        payload,
    }
}

/// Outcome of the slow policy for a draw in `0..200`.
pub fn slow_outcome(draw: u32) -> SimulationOutcome {
    SimulationOutcome {
        draw,
        delay: Duration::from_millis(100 + u64::from(draw)),
        status: StatusCode::OK,
        payload: SLOW_PAYLOAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::source::{FixedDraw, SeededSource};

    #[test]
    fn test_regular_failure_boundary() {
        let at = regular_outcome(25);
        assert_eq!(at.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(at.payload, ERROR_PAYLOAD);
        assert_eq!(at.delay, Duration::from_millis(25));

        let above = regular_outcome(26);
        assert_eq!(above.status, StatusCode::OK);
        assert_eq!(above.payload, REGULAR_PAYLOAD);

        assert!(regular_outcome(1).is_failure());
        assert!(!regular_outcome(100).is_failure());
    }

    #[test]
    fn test_regular_converges_to_quarter_failures() {
        let source = SeededSource::new(7);
        let draws = 10_000;
        let mut failures = 0;

        for _ in 0..draws {
            let outcome = Policy::Regular.simulate(&source);
            assert!((1..=100).contains(&outcome.draw));
            assert_eq!(outcome.delay, Duration::from_millis(outcome.draw as u64));
            if outcome.is_failure() {
                assert!(outcome.draw <= 25, "failure drawn at {}", outcome.draw);
                failures += 1;
            } else {
                assert!(outcome.draw >= 26, "success drawn at {}", outcome.draw);
            }
        }

        let rate = failures as f64 / draws as f64;
        assert!((rate - 0.25).abs() < 0.02, "failure rate {rate}");
    }

    #[test]
    fn test_slow_always_succeeds_within_bounds() {
        let source = SeededSource::new(11);
        for _ in 0..10_000 {
            let outcome = Policy::Slow.simulate(&source);
            assert_eq!(outcome.status, StatusCode::OK);
            assert_eq!(outcome.payload, SLOW_PAYLOAD);
            assert!(outcome.delay >= Duration::from_millis(100));
            assert!(outcome.delay < Duration::from_millis(300));
        }
    }

    #[test]
    fn test_forced_draws() {
        let failing = Policy::Regular.simulate(&FixedDraw(10));
        assert_eq!(failing.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failing.delay, Duration::from_millis(10));

        let slow = Policy::Slow.simulate(&FixedDraw(50));
        assert_eq!(slow.delay, Duration::from_millis(150));

        let slowest = Policy::Slow.simulate(&FixedDraw(199));
        assert_eq!(slowest.delay, Duration::from_millis(299));
    }
}
