//! Error types for noted.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationError;

/// Result type alias using noted's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noted operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Payload or query parameters rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Path identifier is not a well-formed UUID
    #[error("Invalid note ID format: {0}")]
    InvalidIdentifier(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {}", e))
    }
}
