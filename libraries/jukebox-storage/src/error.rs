/// Storage-specific errors
use thiserror::Error;

/// Storage error types
///
/// Only raised while setting up the store; query failures inside the
/// engine surface as `JukeboxError`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for jukebox_core::JukeboxError {
    fn from(err: StorageError) -> Self {
        jukebox_core::JukeboxError::Database(err.to_string())
    }
}
