use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use carecall_core::models::call_event::CallEventError;
use carecall_core::models::pagination::PaginationError;
use carecall_core::models::profile::ProfileError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Unified API error type for all route handlers.
///
/// Every variant renders as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    MethodNotAllowed(&'static str),
    /// `message` is shown to the caller; `detail` is only logged.
    Internal { message: &'static str, detail: String },
}

impl ApiError {
    pub fn internal(message: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message,
            detail: detail.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
            ApiError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg.to_string()),
            ApiError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<CallEventError> for ApiError {
    fn from(e: CallEventError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<PaginationError> for ApiError {
    fn from(e: PaginationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}
