//! Shared prediction pipeline used by every front-end.
//!
//! Per request: LOAD → ENCODE → INFER → ASSEMBLE. Load failure is the only
//! state that produces a failure envelope; anything that goes wrong after the
//! artifacts are loaded is recovered into a success envelope, either per
//! target (in `inference`) or globally here.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use log::{debug, error};
use rayon::prelude::*;

use crate::domain::{PredictionRequest, PredictionResult, ResponseEnvelope};
use crate::encode::encode;
use crate::error::{EncodeError, LoadError};
use crate::inference::engine::panic_message;
use crate::inference::infer;
use crate::io::artifacts::{self, Artifacts};
use crate::report::{PipelineOutcome, assemble};

/// A loaded model store that can answer any number of requests.
///
/// Cloning is cheap; clones share the same read-only artifacts.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
}

impl Predictor {
    /// Load the model store once for repeated use.
    pub fn load(model_dir: &Path) -> Result<Self, LoadError> {
        artifacts::load(model_dir).map(Self::from_artifacts)
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Predict one request. Always returns a success envelope.
    pub fn predict(&self, request: &PredictionRequest) -> ResponseEnvelope {
        assemble(self.run(request))
    }

    /// Predict many requests in parallel; envelopes keep input order.
    pub fn predict_batch(&self, requests: &[PredictionRequest]) -> Vec<ResponseEnvelope> {
        requests.par_iter().map(|req| self.predict(req)).collect()
    }

    fn run(&self, request: &PredictionRequest) -> PipelineOutcome {
        let artifacts = &self.artifacts;
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| -> Result<PredictionResult, EncodeError> {
            let encoded = encode(request, &artifacts.encoders)?;
            debug!("Encoded {request:?} as {:?}", encoded.row);
            Ok(infer(&encoded.row, &artifacts.models).result)
        }));

        match attempt {
            Ok(Ok(result)) => PipelineOutcome::Predicted(result),
            Ok(Err(err)) => recovered(err.to_string()),
            Err(payload) => recovered(format!("panic: {}", panic_message(payload.as_ref()))),
        }
    }
}

fn recovered(cause: String) -> PipelineOutcome {
    error!("Error in prediction pipeline: {cause}. Returning fallback predictions.");
    PipelineOutcome::Recovered { cause }
}

/// One self-contained invocation: load the store, then predict.
///
/// This is the per-process behaviour; long-lived hosts should keep a
/// [`Predictor`] instead of reloading for every request.
pub fn process_prediction(model_dir: &Path, request: &PredictionRequest) -> ResponseEnvelope {
    match Predictor::load(model_dir) {
        Ok(predictor) => predictor.predict(request),
        Err(err) => {
            error!("Failed to load model store: {err}");
            assemble(PipelineOutcome::LoadFailed(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PRICE_FLOOR, PredictionResult, PriceTarget};
    use crate::models::ModelBundle;
    use crate::testing::{
        ConstantModel, FailingModel, PanickingModel, fixture_artifacts, fixture_encoders, fixture_store,
        pune_onion_march,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    fn predictions(env: &ResponseEnvelope) -> PredictionResult {
        *env.predictions().expect("success envelope")
    }

    #[test]
    fn known_request_predicts_from_models() {
        let dir = fixture_store();
        let env = process_prediction(dir.path(), &pune_onion_march());
        let p = predictions(&env);
        assert_eq!(p.min_price, 1200.0);
        assert_eq!(p.max_price, 2600.5);
        assert!((p.modal_price - 1810.0).abs() < 1e-9);
    }

    #[test]
    fn negative_model_output_is_floored() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let env = predictor.predict(&PredictionRequest::new("Nashik", "Onion", "Local", "March"));
        assert_eq!(predictions(&env).min_price, PRICE_FLOOR);
    }

    #[test]
    fn missing_store_yields_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let env = process_prediction(&dir.path().join("models"), &pune_onion_march());
        assert!(!env.is_success());
        assert!(!env.error().unwrap().is_empty());
    }

    #[test]
    fn unknown_categories_still_succeed_with_code_zero() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let unknown = predictor.predict(&PredictionRequest::new("Gotham", "Durian", "Blue", "March"));
        // Code 0 everywhere is the same row as Nashik/Onion/Local.
        let first = predictor.predict(&PredictionRequest::new("Nashik", "Onion", "Local", "March"));
        assert!(unknown.is_success());
        assert_eq!(unknown, first);
    }

    #[test]
    fn invalid_month_recovers_to_global_fallback() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let env = predictor.predict(&PredictionRequest::new("Pune", "Onion", "Local", "march"));
        assert_eq!(env, ResponseEnvelope::success(PredictionResult::fallback()));
    }

    #[test]
    fn faulty_model_falls_back_for_its_target_only() {
        let artifacts = Artifacts {
            encoders: fixture_encoders(),
            models: ModelBundle::new(
                Box::new(ConstantModel(1150.0)),
                Box::new(ConstantModel(2900.0)),
                Box::new(FailingModel),
            ),
        };
        let p = predictions(&Predictor::from_artifacts(artifacts).predict(&pune_onion_march()));
        assert_eq!(p.min_price, 1150.0);
        assert_eq!(p.max_price, 2900.0);
        assert_eq!(p.modal_price, PriceTarget::ModalPrice.fallback());
    }

    #[test]
    fn panicking_model_keeps_other_targets() {
        let artifacts = Artifacts {
            encoders: fixture_encoders(),
            models: ModelBundle::new(
                Box::new(ConstantModel(1150.0)),
                Box::new(PanickingModel),
                Box::new(ConstantModel(1700.0)),
            ),
        };
        let p = predictions(&Predictor::from_artifacts(artifacts).predict(&pune_onion_march()));
        assert_eq!(p.min_price, 1150.0);
        assert_eq!(p.max_price, PriceTarget::MaxPrice.fallback());
        assert_eq!(p.modal_price, 1700.0);
    }

    #[test]
    fn non_finite_models_never_reach_the_envelope() {
        let artifacts = Artifacts {
            encoders: fixture_encoders(),
            models: ModelBundle::new(
                Box::new(ConstantModel(f64::INFINITY)),
                Box::new(ConstantModel(f64::NAN)),
                Box::new(ConstantModel(1700.0)),
            ),
        };
        let env = Predictor::from_artifacts(artifacts).predict(&pune_onion_march());
        let rendered = crate::report::format_envelope(&env, false);
        assert_eq!(
            rendered,
            r#"{"success":true,"predictions":{"min_price":2000.0,"max_price":3000.0,"modal_price":1700.0}}"#
        );
    }

    #[test]
    fn repeated_requests_are_idempotent() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let req = pune_onion_march();
        assert_eq!(predictor.predict(&req), predictor.predict(&req));
    }

    #[test]
    fn batch_keeps_input_order() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let requests = vec![
            pune_onion_march(),
            PredictionRequest::new("Pune", "Onion", "Local", "October"),
            PredictionRequest::new("Pune", "Onion", "Local", "Nope"),
        ];
        let envs = predictor.predict_batch(&requests);
        assert_eq!(envs.len(), 3);
        assert_eq!(predictions(&envs[0]).max_price, 2600.5);
        assert_eq!(predictions(&envs[1]).max_price, 3400.5);
        assert_eq!(predictions(&envs[2]), PredictionResult::fallback());
    }

    #[test]
    fn every_valid_request_gets_plausible_prices() {
        let predictor = Predictor::from_artifacts(fixture_artifacts());
        let labels = ["Pune", "Nashik", "Onion", "Tomato", "Local", "Red", "", "Unknown", "pune"];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let pick = |rng: &mut StdRng| labels[rng.gen_range(0..labels.len())];
            let req = PredictionRequest::new(
                pick(&mut rng),
                pick(&mut rng),
                pick(&mut rng),
                MONTHS[rng.gen_range(0..MONTHS.len())],
            );
            let env = predictor.predict(&req);
            let p = predictions(&env);
            for target in PriceTarget::ALL {
                let v = p.get(target);
                assert!(v.is_finite() && v >= PRICE_FLOOR, "{req:?} -> {target}={v}");
            }
            assert_eq!(env, predictor.predict(&req));
        }
    }
}
