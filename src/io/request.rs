//! Request parsing at the host boundary.
//!
//! The pipeline itself assumes a well-formed `PredictionRequest`. This module
//! turns raw JSON into one, rejecting requests whose required fields are
//! missing, empty or not strings before any artifact is touched.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::PredictionRequest;

/// Error text returned when a required field is absent or empty.
pub const MISSING_FIELDS: &str = "Missing required fields: district, commodity, variety, and month are required";

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    district: Value,
    #[serde(default)]
    commodity: Value,
    #[serde(default)]
    variety: Value,
    #[serde(default)]
    month: Value,
}

fn required(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Parse one request object. The error is the message for a failure envelope.
pub fn parse_request(raw: &str) -> Result<PredictionRequest, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("Invalid request JSON: {e}"))?;
    if !value.is_object() {
        return Err("Invalid request JSON: expected an object".to_string());
    }
    let raw: RawRequest = serde_json::from_value(value).map_err(|e| format!("Invalid request JSON: {e}"))?;

    match (
        required(raw.district),
        required(raw.commodity),
        required(raw.variety),
        required(raw.month),
    ) {
        (Some(district), Some(commodity), Some(variety), Some(month)) => Ok(PredictionRequest {
            district,
            commodity,
            variety,
            month,
        }),
        _ => Err(MISSING_FIELDS.to_string()),
    }
}
