//! OCR backends.
//!
//! - [`GoogleVisionOcr`]: Google Cloud Vision REST API
//! - [`TesseractOcr`]: local `tesseract` + `pdftoppm`
//! - [`DisabledOcr`]: always fails; used when no OCR is configured

mod google_vision;
mod tesseract;

pub use google_vision::{GoogleVisionConfig, GoogleVisionOcr};
pub use tesseract::{TesseractConfig, TesseractOcr};

use async_trait::async_trait;
use insight_core::{DocumentText, Error, OcrBackend, Result, TextRecognition};

/// OCR backend for deployments without OCR.
///
/// Every call fails, so image and scanned-PDF uploads surface an
/// "OCR processing failed" sentinel instead of silently passing through.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOcr;

const DISABLED_MESSAGE: &str = "OCR is not configured";

#[async_trait]
impl OcrBackend for DisabledOcr {
    async fn recognize_text(&self, _image: &[u8]) -> Result<TextRecognition> {
        Err(Error::Ocr(DISABLED_MESSAGE.to_string()))
    }

    async fn recognize_document(&self, _pdf: &[u8]) -> Result<DocumentText> {
        Err(Error::Ocr(DISABLED_MESSAGE.to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
