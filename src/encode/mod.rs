//! Feature encoding.
//!
//! Responsibilities:
//!
//! - translate month names to calendar numbers (`month`)
//! - map categorical labels to training-time integer codes (`encoder`)
//! - assemble the fixed-order feature row fed to every model

pub mod encoder;
pub mod month;

pub use encoder::*;
pub use month::*;
