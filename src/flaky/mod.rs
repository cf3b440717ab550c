//! The flaky endpoint.
//!
//! Each call takes one draw; anything below the failure threshold is a
//! simulated failure, everything else succeeds with `"yay {draw}"`.

pub mod draw;

pub use draw::{DrawSource, RandomDraws, ScriptedDraws};

use crate::http::response::AppError;

/// Decides success or failure for a draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlakyEndpoint {
    failure_threshold: f64,
}

impl FlakyEndpoint {
    pub fn new(failure_threshold: f64) -> Self {
        Self { failure_threshold }
    }

    /// Outcome for a single draw.
    pub fn outcome(&self, draw: f64) -> Result<String, AppError> {
        if draw < self.failure_threshold {
            return Err(AppError::SimulatedFailure { draw });
        }

        tracing::info!(number = draw, "Succeeded");
        Ok(format!("yay {}", draw))
    }

    /// Take a draw from `source` and decide.
    pub fn roll(&self, source: &dyn DrawSource) -> Result<String, AppError> {
        self.outcome(source.next_draw())
    }
}

impl Default for FlakyEndpoint {
    fn default() -> Self {
        Self::new(0.7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_fails() {
        let endpoint = FlakyEndpoint::default();
        for draw in [0.0, 0.1, 0.5, 0.699_999] {
            match endpoint.outcome(draw) {
                Err(AppError::SimulatedFailure { draw: d }) => assert_eq!(d, draw),
                other => panic!("draw {draw} should fail, got {other:?}"),
            }
        }
    }

    #[test]
    fn at_or_above_threshold_succeeds() {
        let endpoint = FlakyEndpoint::default();
        assert_eq!(endpoint.outcome(0.7).unwrap(), "yay 0.7");
        assert_eq!(endpoint.outcome(0.9).unwrap(), "yay 0.9");
        assert_eq!(endpoint.outcome(0.999).unwrap(), "yay 0.999");
    }

    #[test]
    fn failure_message_embeds_draw() {
        let err = FlakyEndpoint::default().outcome(0.4).unwrap_err();
        assert_eq!(err.to_string(), "I failed 0.4");
    }

    #[test]
    fn roll_uses_source() {
        let source = ScriptedDraws::new([0.2, 0.8]);
        let endpoint = FlakyEndpoint::default();
        assert!(endpoint.roll(&source).is_err());
        assert_eq!(endpoint.roll(&source).unwrap(), "yay 0.8");
    }
}
