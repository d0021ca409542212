//! HTTP handlers.

pub mod analyze;
pub mod health;
pub mod media;
pub mod ocr;

use axum::extract::rejection::JsonRejection;

use crate::ApiError;

/// Map a body that failed to deserialize to a 400.
pub(crate) fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequestDetails("Invalid input".to_string(), rejection.body_text())
}

/// Decode a data URI, or treat the whole string as bare base64.
pub(crate) fn decode_upload(input: &str) -> Result<Vec<u8>, insight_core::DataUriError> {
    if input.trim_start().starts_with("data:") {
        insight_core::DataUri::parse(input).map(|uri| uri.into_parts().1)
    } else {
        Ok(insight_core::decode_lenient(input.trim()))
    }
}
