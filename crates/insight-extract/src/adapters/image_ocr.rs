//! ImageOcr extraction adapter: text from PNG and JPEG images via OCR.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use insight_core::defaults::NO_TEXT_IN_IMAGE;
use insight_core::{
    ExtractionAdapter, ExtractionOutcome, ExtractionResult, ExtractionStrategy, OcrBackend, Result,
};

use super::cause;

/// Adapter that runs plain text detection over an image.
///
/// The first detection carries the full text. No detections is a degenerate
/// success reported with the "No text found" sentinel, not an error.
pub struct ImageOcrAdapter {
    ocr: Arc<dyn OcrBackend>,
}

impl ImageOcrAdapter {
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl ExtractionAdapter for ImageOcrAdapter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::ImageOcr
    }

    async fn extract(&self, data: &[u8], mime_type: &str) -> ExtractionResult {
        match self.ocr.recognize_text(data).await {
            Ok(recognition) => match recognition.full_text() {
                Some(text) => {
                    debug!(
                        subsystem = "extract",
                        component = "image_ocr",
                        file_type = mime_type,
                        text_len = text.len(),
                        "Image OCR produced text"
                    );
                    ExtractionResult::ocr(text, ExtractionOutcome::Ok)
                }
                None => {
                    debug!(
                        subsystem = "extract",
                        component = "image_ocr",
                        detections = recognition.detections.len(),
                        "Image OCR found no text"
                    );
                    ExtractionResult::ocr(NO_TEXT_IN_IMAGE, ExtractionOutcome::Empty)
                }
            },
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    component = "image_ocr",
                    backend = self.ocr.name(),
                    error = %e,
                    "Image OCR failed"
                );
                ExtractionResult::ocr(
                    format!("OCR processing failed: {}", cause(&e)),
                    ExtractionOutcome::Failed,
                )
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        self.ocr.health_check().await
    }

    fn name(&self) -> &str {
        "image_ocr"
    }
}
