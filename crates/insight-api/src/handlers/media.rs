//! Embedded image extraction.

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};

use insight_core::defaults::{MAX_BASE64_PAYLOAD_BYTES, MIME_DOCX};
use insight_core::DataUri;
use insight_extract::extract_docx_images;

use super::{decode_upload, invalid_body};
use crate::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractImagesRequest {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractImagesResponse {
    /// One data URI per embedded image.
    pub images: Vec<String>,
}

/// Return the images embedded in a DOCX file as data URIs.
pub async fn extract_images(
    body: Result<Json<ExtractImagesRequest>, JsonRejection>,
) -> Result<Json<ExtractImagesResponse>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;

    let (Some(file), Some(file_type)) = (
        request.file.filter(|f| !f.is_empty()),
        request.file_type.filter(|t| !t.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "No file or fileType provided".to_string(),
        ));
    };

    if file_type != MIME_DOCX {
        return Err(ApiError::BadRequest("Unsupported fileType".to_string()));
    }

    if DataUri::base64_payload_len(&file) > MAX_BASE64_PAYLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge(
            "The uploaded file is too large for image extraction. Please upload a file under 2.5MB (base64-encoded)."
                .to_string(),
        ));
    }

    let data = decode_upload(&file).map_err(|e| {
        ApiError::BadRequestDetails("Invalid file data".to_string(), e.to_string())
    })?;

    let images = tokio::task::spawn_blocking(move || extract_docx_images(&data))
        .await
        .map_err(|e| ApiError::Internal("Failed to extract images".to_string(), e.to_string()))?
        .map_err(|e| ApiError::Internal("Failed to extract images".to_string(), e.to_string()))?;

    Ok(Json(ExtractImagesResponse {
        images: images.iter().map(|image| image.to_data_uri()).collect(),
    }))
}
