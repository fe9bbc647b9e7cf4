//! Error types for ftcscout.
//!
//! This module defines all error types used throughout the ftcscout crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ftcscout operations.
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

    /// A stored value exists but does not decode into the expected record.
    #[error("corrupt record under key '{key}': {source}")]
    CorruptRecord {
        /// The storage key holding the bad value.
        key: String,
        /// The decode failure.
        #[source]
        source: serde_json::Error,
    },

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

    // === Session Errors ===
    /// The operation needs an active observer.
    #[error("no observer is logged in")]
    NotLoggedIn,

    /// Login details were rejected.
    #[error("invalid login: {message}")]
    InvalidLogin {
        /// Description of the rejected field.
        message: String,
    },

    // === Export Errors ===
    /// Writing CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A path sketch could not be encoded or decoded.
    #[error("sketch error: {message}")]
    Sketch {
        /// Description of what went wrong.
        message: String,
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
}

/// A specialized Result type for ftcscout operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a corrupt record error for the given key.
    #[must_use]
    pub fn corrupt_record(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            source,
        }
    }

    /// Create a new sketch error.
    #[must_use]
    pub fn sketch(message: impl Into<String>) -> Self {
        Self::Sketch {
            message: message.into(),
        }
    }

    /// Create a new invalid login error.
    #[must_use]
    pub fn invalid_login(message: impl Into<String>) -> Self {
        Self::InvalidLogin {
            message: message.into(),
        }
    }

    /// Check if this error reports undecodable stored data.
    #[must_use]
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::CorruptRecord { .. })
    }

    /// Check if this error indicates that nobody is logged in.
    #[must_use]
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
    }
}
