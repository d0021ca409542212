//! Question answering over an optional uploaded file.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use insight_core::defaults::MAX_BASE64_PAYLOAD_BYTES;
use insight_core::{AnalyzeRequest, AnswerResult, DataUri};

use super::invalid_body;
use crate::{ApiError, AppState};

/// Answer a question about an uploaded file.
///
/// # Returns
/// - 200 OK with the answer (the apology answer when every model failed)
/// - 400 Bad Request for an invalid body or blank question
/// - 413 Payload Too Large when the base64 payload exceeds the limit
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnswerResult>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;

    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Question is required and must be a non-empty string".to_string(),
        ));
    }

    if let Some(uri) = request.file_data_uri.as_deref() {
        let payload_len = DataUri::base64_payload_len(uri);
        if payload_len > MAX_BASE64_PAYLOAD_BYTES {
            info!(
                subsystem = "api",
                payload_bytes = payload_len,
                limit = MAX_BASE64_PAYLOAD_BYTES,
                "Rejected oversize upload"
            );
            return Err(ApiError::PayloadTooLarge(
                "The uploaded file is too large for analysis. Please upload a file under 2.5MB (base64-encoded)."
                    .to_string(),
            ));
        }
    }

    Ok(Json(state.analyzer.analyze(&request).await))
}
