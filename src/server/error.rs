use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::downloads::DownloadError;
use crate::playlist::{PlaylistError, PlaylistErrorKind};

/// Error body the presentation layer shows as a toast
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
}

impl From<PlaylistError> for ApiError {
    fn from(err: PlaylistError) -> Self {
        let message = err.user_message().to_string();
        match err.kind() {
            PlaylistErrorKind::InvalidInput => ApiError::BadRequest(message),
            PlaylistErrorKind::GenerationFailed => ApiError::BadGateway(message),
        }
    }
}

/// Rejected JSON bodies use the same `{error}` shape as every other failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::AlreadyQueued(_) => ApiError::Conflict(err.to_string()),
            DownloadError::NotQueued(_) => ApiError::NotFound(err.to_string()),
            DownloadError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
