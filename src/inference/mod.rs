//! Multi-target inference.
//!
//! Runs every target model on the encoded row, applies the price floor and
//! isolates per-model failures behind per-target fallbacks.

pub mod engine;

pub use engine::*;
