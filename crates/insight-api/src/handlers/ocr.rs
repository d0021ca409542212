//! Direct OCR over an uploaded image.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use insight_core::validate_ocr_image;

use super::{decode_upload, invalid_body};
use crate::{ApiError, AppState};

const INVALID_IMAGE: &str = "Invalid or unsupported image format";

#[derive(Debug, Deserialize)]
pub struct OcrRequest {
    /// Data URI or bare base64.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OcrResponse {
    pub text: String,
}

/// Recognize text in a PNG or JPEG image.
///
/// The image must decode to at least 100 bytes and start with a PNG or JPEG
/// signature.
pub async fn ocr(
    State(state): State<AppState>,
    body: Result<Json<OcrRequest>, JsonRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;

    let image = request
        .image
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image provided".to_string()))?;

    let data = decode_upload(&image)
        .map_err(|e| ApiError::BadRequestDetails(INVALID_IMAGE.to_string(), e.to_string()))?;

    let validation = validate_ocr_image(&data);
    if !validation.allowed {
        warn!(
            subsystem = "api",
            payload_bytes = data.len(),
            reason = validation.block_reason.as_deref().unwrap_or(""),
            "Rejected OCR image"
        );
        return Err(ApiError::BadRequestDetails(
            INVALID_IMAGE.to_string(),
            validation.block_reason.unwrap_or_default(),
        ));
    }

    let recognition = state.ocr.recognize_text(&data).await.map_err(|e| {
        ApiError::BadRequestDetails("Image decode/OCR failed".to_string(), e.to_string())
    })?;

    Ok(Json(OcrResponse {
        text: recognition.full_text().unwrap_or_default().to_string(),
    }))
}
