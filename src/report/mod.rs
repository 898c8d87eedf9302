//! Response assembly: pipeline outcomes to envelopes, envelopes to JSON.

pub mod format;

pub use format::*;

use crate::domain::{PredictionResult, ResponseEnvelope};
use crate::error::LoadError;

/// Terminal state of one request.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Artifacts could not be loaded; the only reportable failure.
    LoadFailed(LoadError),
    /// Encoding and inference completed (possibly with per-target fallbacks).
    Predicted(PredictionResult),
    /// Something failed after load outside the per-target handlers.
    Recovered { cause: String },
}

/// Wrap an outcome into the response envelope.
pub fn assemble(outcome: PipelineOutcome) -> ResponseEnvelope {
    match outcome {
        PipelineOutcome::LoadFailed(err) => ResponseEnvelope::failure(err.to_string()),
        PipelineOutcome::Predicted(result) => ResponseEnvelope::success(result),
        PipelineOutcome::Recovered { .. } => ResponseEnvelope::success(PredictionResult::fallback()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn load_failure_is_the_only_failure_envelope() {
        let err = LoadError::Missing {
            path: PathBuf::from("models/label_encoders.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let env = assemble(PipelineOutcome::LoadFailed(err));
        assert!(!env.is_success());
        assert!(!env.error().unwrap().is_empty());
    }

    #[test]
    fn recovered_outcome_reports_success_with_fallbacks() {
        let env = assemble(PipelineOutcome::Recovered {
            cause: "unknown month name 'Smarch'".into(),
        });
        assert_eq!(env, ResponseEnvelope::success(PredictionResult::fallback()));
    }

    #[test]
    fn predicted_outcome_is_passed_through() {
        let result = PredictionResult {
            min_price: 1200.0,
            max_price: 2600.5,
            modal_price: 1810.0,
        };
        assert_eq!(assemble(PipelineOutcome::Predicted(result)).predictions(), Some(&result));
    }
}
