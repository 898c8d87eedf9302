//! `mandi-price` library crate.
//!
//! The binary (`mandi`) is a thin wrapper around this library so that:
//!
//! - the prediction pipeline is testable without spawning processes
//! - long-lived hosts can keep a loaded `Predictor` instead of reloading per request
//! - each stage (load, encode, infer, assemble) stays easy to navigate

pub mod app;
pub mod cli;
pub mod domain;
pub mod encode;
pub mod error;
pub mod inference;
pub mod io;
pub mod models;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;
