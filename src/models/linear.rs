//! Linear booster (gblinear).
//!
//! `margin = base_margin + bias + w · x`, in `f32` like XGBoost.

use nalgebra::DVector;

use crate::error::PredictError;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearBooster {
    weights: DVector<f32>,
    bias: f32,
}

impl LinearBooster {
    pub fn new(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            weights: DVector::from_vec(weights),
            bias,
        }
    }

    /// Number of feature coefficients.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn margin(&self, base_margin: f32, features: &[f64]) -> Result<f32, PredictError> {
        if features.len() != self.weights.len() {
            return Err(PredictError::FeatureCount {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        let x = DVector::from_iterator(features.len(), features.iter().map(|&v| v as f32));
        Ok(base_margin + self.bias + self.weights.dot(&x))
    }
}
