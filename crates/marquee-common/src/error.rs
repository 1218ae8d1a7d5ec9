//! Common error types used throughout marquee.
//!
//! This module provides the error type for persisted session state: reading,
//! parsing, and rewriting the token file.

/// Common error type for marquee.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing persisted session state failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing or parsing JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
