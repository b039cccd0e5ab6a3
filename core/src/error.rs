//! Error types for wordgrid-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the core crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Timestamp does not match `YYYY-MM-DDThh:mm:ss±hh:mm`
    #[error("Invalid timestamp format: {input:?}")]
    InvalidFormat { input: String },

    /// I/O error while reading a dataset
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset file extension is not one of yaml, yml or json
    #[error("Unsupported dataset format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// No default data directory could be determined for this platform
    #[error("Configuration error: {0}")]
    Config(String),
}
