//! Per-target model invocation with floor and fallback.

use std::panic::{self, AssertUnwindSafe};

use log::warn;

use crate::domain::{EncodedFeatureRow, PRICE_FLOOR, PredictionResult, PriceTarget};
use crate::error::PredictError;
use crate::models::{ModelBundle, Regressor};

/// Inference output: the result plus the targets that fell back and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub result: PredictionResult,
    pub failures: Vec<(PriceTarget, PredictError)>,
}

/// Clamp a raw model output to the price floor.
pub fn apply_floor(raw: f64) -> f64 {
    raw.max(PRICE_FLOOR)
}

/// Run all three target models on `row`. Never fails as a whole.
pub fn infer(row: &EncodedFeatureRow, models: &ModelBundle) -> Inference {
    let features = row.values();
    let mut result = PredictionResult::fallback();
    let mut failures = Vec::new();

    for (target, model) in models.iter() {
        match invoke(model, &features) {
            Ok(raw) => result.set(target, apply_floor(raw)),
            Err(err) => {
                warn!("Error predicting {target}: {err}. Using fallback value.");
                result.set(target, target.fallback());
                failures.push((target, err));
            }
        }
    }

    Inference { result, failures }
}

/// One model call. Panics and non-finite outputs count as failures of that model only.
fn invoke(model: &dyn Regressor, features: &[f64]) -> Result<f64, PredictError> {
    let raw = panic::catch_unwind(AssertUnwindSafe(|| model.predict(features)))
        .map_err(|payload| PredictError::Model(format!("model panicked: {}", panic_message(payload.as_ref()))))??;
    if !raw.is_finite() {
        return Err(PredictError::NonFinite(raw));
    }
    Ok(raw)
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string payload".to_string()
    }
}
