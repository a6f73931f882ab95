//! Core error types for habitloop-core.
//!
//! Expected outcomes (a full free tier, a failed unlock) are modelled as
//! values elsewhere; this hierarchy only covers conditions the caller has
//! to report or recover from.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Insight generation errors
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A value could not be encoded for storage
    #[error("Failed to encode value for key '{key}': {message}")]
    Encode { key: String, message: String },

    /// A stored value could not be decoded
    #[error("Failed to decode value for key '{key}': {message}")]
    Decode { key: String, message: String },

    /// The habit service task is no longer running
    #[error("Habit service has stopped")]
    ServiceStopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name is blank
    #[error("Habit name must not be empty")]
    EmptyName,

    /// Quantity target is zero
    #[error("Target value for '{unit}' must be at least 1")]
    ZeroTarget { unit: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Insight generation errors. Never surfaced past `InsightService`.
#[derive(Error, Debug)]
pub enum InsightError {
    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Insight API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// Response did not contain generated text
    #[error("Response contained no text")]
    EmptyResponse,

    /// Generated text could not be parsed
    #[error("Failed to parse generated insights: {0}")]
    Parse(String),

    /// No API key configured
    #[error("No API key configured for the insight service")]
    MissingApiKey,

    /// Invalid endpoint URL
    #[error("Invalid insight endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for StorageError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        StorageError::ServiceStopped
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for StorageError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        StorageError::ServiceStopped
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
