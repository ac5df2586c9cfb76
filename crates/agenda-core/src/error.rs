//! Core error types for agenda-core.
//!
//! Local storage, configuration, the cloud client and the share transport
//! each get their own error enum; `CoreError` wraps them for callers that
//! cross layers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for agenda-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote API errors
    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),

    /// Share transport errors
    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// A row with the same primary key already exists
    #[error("Record already exists: {0}")]
    DuplicateId(String),

    /// Stored row could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Remote API errors.
#[derive(Error, Debug)]
pub enum CloudError {
    /// No device identity has been registered on this install
    #[error("No device UUID stored; run `agenda cloud register` first")]
    MissingIdentity,

    /// Stored or supplied identity is not a UUID
    #[error("Invalid device UUID: {0}")]
    InvalidIdentity(String),

    /// Cloud access is switched off in the configuration
    #[error("Cloud access is disabled (cloud.enabled = false)")]
    Disabled,

    /// Invalid base URL in configuration
    #[error("Invalid cloud base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be turned into a model value
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Share transport errors.
#[derive(Error, Debug)]
pub enum ShareError {
    /// Could not open the listening socket
    #[error("Failed to listen on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accept failed; the listener is closed
    #[error("Accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// Reading the single message failed
    #[error("Connection lost while reading: {0}")]
    Read(#[source] std::io::Error),

    /// Connecting to or writing to a peer failed
    #[error("Failed to send share code to {peer}: {source}")]
    Send {
        peer: String,
        #[source]
        source: std::io::Error,
    },

    /// Listener was cancelled before a message arrived
    #[error("Listener cancelled")]
    Cancelled,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required text field is empty
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) => match e.code {
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    DatabaseError::Locked
                }
                rusqlite::ErrorCode::ConstraintViolation
                    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    DatabaseError::DuplicateId(msg.clone().unwrap_or_else(|| err.to_string()))
                }
                _ => DatabaseError::QueryFailed(err.to_string()),
            },
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
