//! Error types.
//!
//! - `LoadError`: the artifact bundle could not be loaded (the only failure a
//!   caller ever sees in a response)
//! - `EncodeError`: the request violates an encoding precondition
//! - `PredictError`: a single model invocation failed
//! - `AppError`: host-level failure carrying a process exit code

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Failure to load the encoder/model bundle.
#[derive(Debug)]
pub enum LoadError {
    /// The artifact file could not be read.
    Missing { path: PathBuf, source: std::io::Error },
    /// The artifact is not valid JSON for its schema.
    Corrupt { path: PathBuf, source: serde_json::Error },
    /// The artifact parsed but cannot be used by this pipeline.
    Incompatible { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn incompatible(path: &Path, reason: impl Into<String>) -> Self {
        LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::Missing { path, .. }
            | LoadError::Corrupt { path, .. }
            | LoadError::Incompatible { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Missing { path, source } => {
                write!(f, "Failed to open artifact '{}': {source}", path.display())
            }
            LoadError::Corrupt { path, source } => {
                write!(f, "Invalid artifact '{}': {source}", path.display())
            }
            LoadError::Incompatible { path, reason } => {
                write!(f, "Incompatible artifact '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Missing { source, .. } => Some(source),
            LoadError::Corrupt { source, .. } => Some(source),
            LoadError::Incompatible { .. } => None,
        }
    }
}

/// A request that breaks an encoding precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    UnknownMonth(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnknownMonth(name) => write!(f, "unknown month name '{name}'"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// A single model invocation that could not produce a usable number.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// The feature row is narrower or wider than the model expects.
    FeatureCount { expected: usize, actual: usize },
    /// The model produced NaN or an infinity.
    NonFinite(f64),
    /// Any other model-specific failure.
    Model(String),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::FeatureCount { expected, actual } => {
                write!(f, "model expects {expected} features, got {actual}")
            }
            PredictError::NonFinite(v) => write!(f, "model produced a non-finite value ({v})"),
            PredictError::Model(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for PredictError {}
