//! API error type and its JSON rendering.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Errors returned by handlers, rendered as `{ "error": ..., "details": ... }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadRequestDetails(String, String),
    PayloadTooLarge(String),
    Internal(String, String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::BadRequestDetails(..) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<insight_core::Error> for ApiError {
    fn from(err: insight_core::Error) -> Self {
        match err {
            insight_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            insight_core::Error::PayloadTooLarge(msg) => ApiError::PayloadTooLarge(msg),
            other => ApiError::Internal("Failed to process request".to_string(), other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(error) => ErrorBody {
                error,
                details: None,
            },
            ApiError::BadRequestDetails(error, details) | ApiError::Internal(error, details) => {
                ErrorBody {
                    error,
                    details: Some(details),
                }
            }
            ApiError::PayloadTooLarge(details) => ErrorBody {
                error: "File too large".to_string(),
                details: Some(details),
            },
        };

        if status.is_server_error() {
            tracing::error!(subsystem = "api", error = %body.error, details = ?body.details, "Request failed");
        } else {
            tracing::debug!(subsystem = "api", status = status.as_u16(), error = %body.error, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
