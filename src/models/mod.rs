//! Trained regressor implementations.
//!
//! Models are evaluated on one already-encoded feature row at a time. The
//! `Regressor` trait is the seam between the inference engine and concrete
//! boosters, so engines stay generic and tests can inject failing models.

pub mod bundle;
pub mod linear;
pub mod regressor;
pub mod tree;

pub use bundle::*;
pub use linear::*;
pub use regressor::*;
pub use tree::*;
