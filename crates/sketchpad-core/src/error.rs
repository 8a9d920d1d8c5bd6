//! Error types.
//!
//! Geometry and interaction never fail; the only fallible surface is loading
//! and validating configuration.

use thiserror::Error;

/// Errors produced by the core library.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible core operations.
pub type SketchResult<T> = Result<T, SketchError>;
