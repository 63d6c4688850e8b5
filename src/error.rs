//! Error types for the service catalog.
//!
//! `ApiError` is what every service-facing operation returns. `StorageError`
//! carries backend detail from the document stores and surfaces through
//! `ApiError::StorageError`, which callers treat as the store being unavailable.

use thiserror::Error;

/// Backend failures raised by a document store implementation
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("record encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("corrupt stored record for '{key}': {message}")]
    CorruptRecord { key: String, message: String },
}

/// Errors surfaced by catalog operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submitted entry is malformed (blank or missing name)
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Submitted JSON could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// Stored payload is corrupted and cannot be decoded
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Stored document decodes, but not as a catalog
    #[error("document '{key}' holds '{found}', expected '{expected}'")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// Another writer replaced the document since it was fetched
    #[error("concurrent modification of document '{key}'")]
    Conflict { key: String },

    /// No catalog entry carries the requested name
    #[error("no catalog entry named '{name}'")]
    EntryNotFound { name: String },

    /// A command argument has an unsupported value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl ApiError {
    /// Whether repeating the whole read-modify-write cycle may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// Whether the failure comes from the document store rather than the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::Unavailable(_) | ApiError::StorageError(_))
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseError(err.to_string())
    }
}
