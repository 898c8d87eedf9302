//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - price targets and categorical feature fields (`PriceTarget`, `CategoricalField`)
//! - the request and its encoded feature row (`PredictionRequest`, `EncodedFeatureRow`)
//! - pipeline outputs (`PredictionResult`, `ResponseEnvelope`)
//! - the floor and fallback constants shared by every recovery path

pub mod types;

pub use types::*;
