//! Core error types for the playlist engine

use thiserror::Error;

/// Result type alias using `JukeboxError`
pub type Result<T> = std::result::Result<T, JukeboxError>;

/// Core error type shared by storage and server layers
///
/// The variants mirror the error taxonomy the HTTP layer maps to status
/// codes: `Validation` is raised before any transaction opens, everything
/// raised inside a transaction rolls it back.
#[derive(Error, Debug)]
pub enum JukeboxError {
    /// Malformed or out-of-range input (negative position, oversized text)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity ("Playlist", "Track")
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Visibility or edit-mode rule violated
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Operation conflicts with the current state (e.g. move on an empty playlist)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Any other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JukeboxError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for JukeboxError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
