//! Regressor trait and the boosted-model wrapper.

use crate::error::PredictError;
use crate::models::{LinearBooster, TreeEnsemble};

/// A trained function from a feature row to one continuous value.
pub trait Regressor: Send + Sync {
    /// Predict a single value for `features` (training column order).
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError>;

    /// Short human-readable description for diagnostics.
    fn describe(&self) -> String;
}

/// Output transformation applied to the raw margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Squared-error style objectives: output is the margin.
    Identity,
    /// Log-link objectives (gamma, tweedie, poisson): output is `exp(margin)`.
    Exp,
}

impl Link {
    pub fn apply(self, margin: f32) -> f32 {
        match self {
            Link::Identity => margin,
            Link::Exp => margin.exp(),
        }
    }

    /// Convert a base score from output space into margin space.
    pub fn to_margin(self, base_score: f32) -> f32 {
        match self {
            Link::Identity => base_score,
            Link::Exp => base_score.max(1e-7).ln(),
        }
    }
}

/// Gradient booster body.
#[derive(Debug, Clone, PartialEq)]
pub enum Booster {
    Trees(TreeEnsemble),
    Linear(LinearBooster),
}

/// A boosted regression model: booster + base margin + link.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedRegressor {
    pub booster: Booster,
    pub base_margin: f32,
    pub link: Link,
    /// Objective name the model was trained with.
    pub objective: String,
}

impl BoostedRegressor {
    fn margin(&self, features: &[f64]) -> Result<f32, PredictError> {
        match &self.booster {
            Booster::Trees(trees) => trees.margin(self.base_margin, features),
            Booster::Linear(linear) => linear.margin(self.base_margin, features),
        }
    }
}

impl Regressor for BoostedRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        let value = f64::from(self.link.apply(self.margin(features)?));
        if !value.is_finite() {
            return Err(PredictError::NonFinite(value));
        }
        Ok(value)
    }

    fn describe(&self) -> String {
        match &self.booster {
            Booster::Trees(trees) => format!("{} trees ({})", trees.len(), self.objective),
            Booster::Linear(linear) => format!("linear, {} weights ({})", linear.len(), self.objective),
        }
    }
}
