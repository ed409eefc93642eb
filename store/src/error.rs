//! Error types for loading operations.
//!
//! Covers I/O, JSON and YAML parsing, schema validation and override store
//! consistency.

use std::path::PathBuf;

use api_decl_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading inputs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The schema document was parsed but is not usable.
    #[error("invalid schema document: {0}")]
    InvalidSchema(#[from] ValidationError),

    /// An override entry cannot be used as a manual override.
    #[error("invalid override `{name}`: {reason}")]
    InvalidOverride { name: String, reason: String },

    /// Two override entries share a name.
    #[error("duplicate override `{0}`")]
    DuplicateOverride(String),

    /// The file extension does not name a supported format.
    #[error("unsupported override file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// All configured override sources failed.
    #[error("no override sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
