//! Error types for menuboard.
//!
//! This module defines all error types used throughout the menuboard crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for menuboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A blocking store task did not complete.
    #[error("store task failed: {0}")]
    StoreTask(#[from] tokio::task::JoinError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Ledger Errors ===
    /// A persisted ledger value did not match the expected shape.
    #[error("malformed ledger under key '{key}': {message}")]
    MalformedLedger {
        /// Store key the value was read from.
        key: String,
        /// Description of the mismatch.
        message: String,
    },

    // === Input Errors ===
    /// Quantity text was not a whole number of at least one.
    #[error("invalid quantity '{input}': enter a whole number of at least 1")]
    InvalidQuantity {
        /// The rejected text.
        input: String,
    },

    /// Price text was not a non-negative whole number.
    #[error("invalid price '{input}': enter a whole number of rupees")]
    InvalidPrice {
        /// The rejected text.
        input: String,
    },

    /// Name text was empty.
    #[error("invalid name: a menu item needs a name")]
    InvalidName,

    /// A rename would collide with another catalog entry.
    #[error("a menu item named '{name}' already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for menuboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a malformed ledger error for the given key.
    #[must_use]
    pub fn malformed_ledger(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedLedger {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from rejecting user input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity { .. }
                | Self::InvalidPrice { .. }
                | Self::InvalidName
                | Self::DuplicateName { .. }
        )
    }
}
