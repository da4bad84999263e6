//! Error types for generating and applying DDL.

use std::path::PathBuf;

use oxide_ddl_core::ValidationError;

/// Errors raised by the executor side of the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptors were rejected before any SQL was produced.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database rejected a statement or could not be reached.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading descriptor files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A descriptor file could not be read.
    #[error("Failed to read descriptor file '{path}': {source}")]
    Input {
        /// Path to the descriptor file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// Serialization error (JSON output).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the validation error, looking through file context.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Input { source, .. } => source.as_validation(),
            _ => None,
        }
    }

    /// Returns the database error, looking through file context.
    #[must_use]
    pub fn as_database(&self) -> Option<&sqlx::Error> {
        match self {
            Self::Database(err) => Some(err),
            Self::Input { source, .. } => source.as_database(),
            _ => None,
        }
    }
}

/// Result type for executor-side operations.
pub type Result<T> = std::result::Result<T, Error>;
