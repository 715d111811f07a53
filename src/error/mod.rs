//! Error types and Result aliases for codemap.
//!
//! Only failures that make the whole scan meaningless surface here. A file
//! that cannot be read is skipped by the scanner and never becomes an error.

use thiserror::Error;

/// Result type alias using codemap's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for codemap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Scan error.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while reading a config file or artifact.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Scanner-specific errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// An ignore glob failed to compile.
    #[error("invalid ignore glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// A text extension is not of the form `.ext`.
    #[error("invalid text extension '{0}'")]
    InvalidExtension(String),

    /// The artifacts directory or the artifact file could not be written.
    #[error("failed to write artifact '{path}': {reason}")]
    ArtifactWrite { path: String, reason: String },

    /// The code map could not be serialized.
    #[error("failed to serialize code map: {0}")]
    Serialize(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl ScanError {
    /// Create an artifact write error.
    pub fn artifact_write(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
