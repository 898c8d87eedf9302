//! Input/output helpers.
//!
//! - model-store loading (`artifacts`)
//! - XGBoost JSON model parsing (`xgboost`)
//! - request parsing at the host boundary (`request`)

pub mod artifacts;
pub mod request;
pub mod xgboost;

pub use artifacts::*;
pub use request::*;
