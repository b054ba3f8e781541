/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jukebox_core::JukeboxError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<JukeboxError> for ServerError {
    fn from(err: JukeboxError) -> Self {
        match err {
            JukeboxError::Validation(msg) => ServerError::BadRequest(msg),
            e @ JukeboxError::NotFound { .. } => ServerError::NotFound(e.to_string()),
            JukeboxError::Forbidden(msg) => ServerError::Forbidden(msg),
            JukeboxError::Conflict(msg) => ServerError::Conflict(msg),
            JukeboxError::Database(msg) => ServerError::Database(msg),
            JukeboxError::Internal(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<jukebox_storage::StorageError> for ServerError {
    fn from(err: jukebox_storage::StorageError) -> Self {
        // Convert StorageError -> JukeboxError -> ServerError
        JukeboxError::from(err).into()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: JukeboxError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(status_of(JukeboxError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(JukeboxError::not_found("Track", "t")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(JukeboxError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(JukeboxError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_of(JukeboxError::Database("locked".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
