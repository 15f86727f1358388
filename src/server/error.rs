use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::errors::{FormError, SubmissionError};

/// HTTP-facing error: validation problems map to 400, missing records to 404,
/// everything else to a generic 500 with the original error logged server-side.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    name: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            name: "ValidationError",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            name: "NotFoundError",
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            name: "InternalServerError",
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "status": self.status.as_u16(),
                "name": self.name,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        if err.is_not_found() {
            Self::not_found(err.to_string())
        } else if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            tracing::error!(code = err.error_code(), "form operation failed: {}", err);
            Self::internal()
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        if err.is_not_found() {
            Self::not_found(err.to_string())
        } else {
            tracing::error!(
                code = err.error_code(),
                "submission operation failed: {}",
                err
            );
            Self::internal()
        }
    }
}
