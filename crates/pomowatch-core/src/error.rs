//! Core error types for pomowatch-core.
//!
//! Nothing in the countdown engine is fatal: link and alert failures are
//! logged and absorbed at their boundaries. These types exist for the edges
//! (storage, configuration, status queries) that do report failure.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomowatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Keeper link errors
    #[error("Keeper link error: {0}")]
    Link(#[from] LinkError),

    /// Alert dispatch errors
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures on the foreground <-> keeper link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The keeper task is gone (never started or torn down).
    #[error("keeper is unreachable")]
    Closed,

    /// The command buffer is full; the command was dropped.
    #[error("keeper command buffer is full")]
    Full,

    /// A status query got no reply in time.
    #[error("keeper did not answer within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

/// Alert collaborator failures. Never propagated into the state machine.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("alert channel unavailable: {0}")]
    Unavailable(String),

    #[error("alert dispatch failed: {0}")]
    Failed(String),

    #[error("alert IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored row could not be decoded
    #[error("Corrupt session row {row}: {message}")]
    CorruptRow { row: i64, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable data directory
    #[error("Cannot prepare data directory: {0}")]
    DataDir(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_error_wraps_into_core_error() {
        let err: CoreError = LinkError::Closed.into();
        assert_eq!(err.to_string(), "Keeper link error: keeper is unreachable");
    }

    #[test]
    fn timeout_message_mentions_budget() {
        let err = LinkError::Timeout { timeout_ms: 500 };
        assert!(err.to_string().contains("500 ms"));
    }
}
