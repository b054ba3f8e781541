/// Request extractors
use crate::error::ServerError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// JSON body whose rejection is reported as a 400 in the API error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}
