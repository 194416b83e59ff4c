use crate::state::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use football_api::wire::ErrorResponse;
use log::error;
use std::fmt;

/// Everything a handler can fail with. Rendered as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::BadRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::NotFound(msg)
            | ServerError::Internal(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ServerError::NotFound(msg),
            StoreError::Conflict(msg) | StoreError::Invalid(msg) => ServerError::BadRequest(msg),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let ServerError::Internal(msg) = &self {
            error!("internal error: {msg}");
        }
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
