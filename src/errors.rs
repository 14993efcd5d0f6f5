//! Shared error types for clustereval
//!
//! Scoring itself never fails: every degenerate input collapses to an
//! all-zero metric record. Errors only surface at the I/O edges, namely
//! loading benchmark instances, reading or writing configuration and
//! emitting reports.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clustereval operations
#[derive(Debug, Error)]
pub enum Error {
    /// A benchmark instance file could not be interpreted
    #[error("Invalid instance {}: {message}", path.display())]
    InvalidInstance { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool construction errors
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML decoding errors
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML encoding errors
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Create an invalid instance error for a file
    pub fn invalid_instance(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidInstance {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::from(e).with_context(context))
    }
}
