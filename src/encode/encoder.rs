//! Categorical label encoders and request encoding.
//!
//! A `LabelEncoder` is the inference-side view of a fitted label encoder: an
//! ordered list of known labels where a label's code is its position. Unknown
//! labels never fail; they degrade to [`UNKNOWN_CATEGORY_CODE`].

use std::collections::HashMap;

use log::info;

use crate::domain::{CategoricalField, EncodedFeatureRow, PredictionRequest};
use crate::encode::month_number;
use crate::error::EncodeError;

/// Code used for labels the encoder has never seen.
///
/// This is the code of the *first* known category, not a missing-value marker.
pub const UNKNOWN_CATEGORY_CODE: i64 = 0;

/// Ordered known labels with a label → code lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Build an encoder from its ordered class list.
    ///
    /// Returns the first duplicated label as the error.
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (i, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), i as i64).is_some() {
                return Err(label.clone());
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.codes.contains_key(label)
    }

    /// Code of a known label.
    pub fn transform(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }
}

/// Encoders keyed by categorical field. Fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderBundle {
    encoders: HashMap<CategoricalField, LabelEncoder>,
}

impl EncoderBundle {
    pub fn new(encoders: HashMap<CategoricalField, LabelEncoder>) -> Self {
        Self { encoders }
    }

    pub fn get(&self, field: CategoricalField) -> Option<&LabelEncoder> {
        self.encoders.get(&field)
    }

    /// Fields with no encoder; every value of these falls back.
    pub fn missing_fields(&self) -> Vec<CategoricalField> {
        CategoricalField::ALL
            .into_iter()
            .filter(|f| !self.encoders.contains_key(f))
            .collect()
    }

    /// Encode one raw label, reporting whether the fallback code was used.
    pub fn encode_label(&self, field: CategoricalField, label: &str) -> (i64, bool) {
        match self.get(field).and_then(|enc| enc.transform(label)) {
            Some(code) => (code, false),
            None => (UNKNOWN_CATEGORY_CODE, true),
        }
    }
}

/// Encoding output: the feature row plus the fields that fell back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub row: EncodedFeatureRow,
    pub fallbacks: Vec<CategoricalField>,
}

/// Encode a request into the model feature row.
///
/// Categorical encoding is total. The only error is a month name outside the
/// fixed table, which the caller treats as a pipeline failure.
pub fn encode(request: &PredictionRequest, encoders: &EncoderBundle) -> Result<EncodedRequest, EncodeError> {
    let month = month_number(&request.month).ok_or_else(|| EncodeError::UnknownMonth(request.month.clone()))?;

    let mut row = EncodedFeatureRow {
        district_name: UNKNOWN_CATEGORY_CODE,
        commodity_name: UNKNOWN_CATEGORY_CODE,
        variety: UNKNOWN_CATEGORY_CODE,
        month,
    };
    let mut fallbacks = Vec::new();

    for field in CategoricalField::ALL {
        let raw = request.categorical(field);
        let (code, fell_back) = encoders.encode_label(field, raw);
        if fell_back {
            info!("Unknown {field} '{raw}', using fallback code {UNKNOWN_CATEGORY_CODE}");
            fallbacks.push(field);
        }
        row.set_categorical(field, code);
    }

    Ok(EncodedRequest { row, fallbacks })
}
