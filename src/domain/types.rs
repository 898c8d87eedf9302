//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - parsed straight from the request JSON
//! - passed by value between the encoder, inference engine and assembler
//! - written back out as the response envelope

use std::fmt;
use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Minimum price any real prediction is clamped to.
pub const PRICE_FLOOR: f64 = 100.0;

/// Fallback `min_price` when a prediction cannot be produced.
pub const FALLBACK_MIN_PRICE: f64 = 2000.0;
/// Fallback `max_price` when a prediction cannot be produced.
pub const FALLBACK_MAX_PRICE: f64 = 3000.0;
/// Fallback `modal_price` when a prediction cannot be produced.
pub const FALLBACK_MODAL_PRICE: f64 = 2500.0;

/// One of the three price series a model is trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTarget {
    MinPrice,
    MaxPrice,
    ModalPrice,
}

impl PriceTarget {
    /// Every target, in response order.
    pub const ALL: [PriceTarget; 3] = [PriceTarget::MinPrice, PriceTarget::MaxPrice, PriceTarget::ModalPrice];

    /// Key used in the response and in artifact names.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceTarget::MinPrice => "min_price",
            PriceTarget::MaxPrice => "max_price",
            PriceTarget::ModalPrice => "modal_price",
        }
    }

    /// Artifact name (without extension) of the model trained for this target.
    pub fn artifact_name(self) -> String {
        format!("xgboost_model_{}", self.as_str())
    }

    /// Fixed value substituted when this target cannot be predicted.
    pub fn fallback(self) -> f64 {
        match self {
            PriceTarget::MinPrice => FALLBACK_MIN_PRICE,
            PriceTarget::MaxPrice => FALLBACK_MAX_PRICE,
            PriceTarget::ModalPrice => FALLBACK_MODAL_PRICE,
        }
    }
}

impl fmt::Display for PriceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical request fields that go through a label encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    DistrictName,
    CommodityName,
    Variety,
}

impl CategoricalField {
    /// Every categorical field, in training column order.
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::DistrictName,
        CategoricalField::CommodityName,
        CategoricalField::Variety,
    ];

    /// Column name used at training time (and as the encoder key).
    pub fn as_str(self) -> &'static str {
        match self {
            CategoricalField::DistrictName => "district_name",
            CategoricalField::CommodityName => "commodity_name",
            CategoricalField::Variety => "variety",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single price query, exactly as the caller sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub district: String,
    pub commodity: String,
    pub variety: String,
    /// Full English month name (`"January"` .. `"December"`).
    pub month: String,
}

impl PredictionRequest {
    pub fn new(
        district: impl Into<String>,
        commodity: impl Into<String>,
        variety: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            commodity: commodity.into(),
            variety: variety.into(),
            month: month.into(),
        }
    }

    /// Raw value supplied for a categorical field.
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::DistrictName => &self.district,
            CategoricalField::CommodityName => &self.commodity,
            CategoricalField::Variety => &self.variety,
        }
    }
}

/// Numeric feature row fed to every model.
///
/// Field order is the training-time column order; see [`EncodedFeatureRow::COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedFeatureRow {
    pub district_name: i64,
    pub commodity_name: i64,
    pub variety: i64,
    /// Calendar month, 1..=12.
    pub month: u32,
}

impl EncodedFeatureRow {
    /// Column names in the order the models were trained on.
    pub const COLUMNS: [&'static str; 4] = ["district_name", "commodity_name", "variety", "month"];

    /// Number of feature columns.
    pub const WIDTH: usize = Self::COLUMNS.len();

    /// Feature values in column order.
    pub fn values(&self) -> [f64; Self::WIDTH] {
        [
            self.district_name as f64,
            self.commodity_name as f64,
            self.variety as f64,
            f64::from(self.month),
        ]
    }

    pub fn set_categorical(&mut self, field: CategoricalField, code: i64) {
        match field {
            CategoricalField::DistrictName => self.district_name = code,
            CategoricalField::CommodityName => self.commodity_name = code,
            CategoricalField::Variety => self.variety = code,
        }
    }
}

/// Predicted prices keyed by target.
///
/// Every value is either at least [`PRICE_FLOOR`] or the target's fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
}

impl PredictionResult {
    /// All three targets at their fallback values.
    pub fn fallback() -> Self {
        Self {
            min_price: FALLBACK_MIN_PRICE,
            max_price: FALLBACK_MAX_PRICE,
            modal_price: FALLBACK_MODAL_PRICE,
        }
    }

    pub fn get(&self, target: PriceTarget) -> f64 {
        match target {
            PriceTarget::MinPrice => self.min_price,
            PriceTarget::MaxPrice => self.max_price,
            PriceTarget::ModalPrice => self.modal_price,
        }
    }

    pub fn set(&mut self, target: PriceTarget, value: f64) {
        match target {
            PriceTarget::MinPrice => self.min_price = value,
            PriceTarget::MaxPrice => self.max_price = value,
            PriceTarget::ModalPrice => self.modal_price = value,
        }
    }
}

/// Uniform response wrapper returned for every request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Success { predictions: PredictionResult },
    Failure { error: String },
}

impl ResponseEnvelope {
    pub fn success(predictions: PredictionResult) -> Self {
        ResponseEnvelope::Success { predictions }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ResponseEnvelope::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    pub fn predictions(&self) -> Option<&PredictionResult> {
        match self {
            ResponseEnvelope::Success { predictions } => Some(predictions),
            ResponseEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure { error } => Some(error),
        }
    }
}

// The wire shape carries a boolean `success` tag, which serde's enum tagging
// cannot express directly.
impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            ResponseEnvelope::Success { predictions } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("predictions", predictions)?;
            }
            ResponseEnvelope::Failure { error } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

/// Runtime configuration of the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Directory holding the encoder and model artifacts.
    pub model_dir: PathBuf,
}

impl ServiceConfig {
    /// Relative model-store path used when nothing else is configured.
    pub const DEFAULT_MODEL_DIR: &'static str = "./models";

    /// Environment variable overriding the model-store path.
    pub const MODEL_DIR_ENV: &'static str = "MANDI_MODEL_DIR";
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(Self::DEFAULT_MODEL_DIR),
        }
    }
}
