//! Normalization pipeline: decode, dispatch, extract, select.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use insight_core::defaults::MAX_DECODED_BYTES;
use insight_core::{
    AnalyzeRequest, DataUri, ExtractionStrategy, MediaReference, NormalizedContentBundle,
    OcrBackend,
};

use crate::registry::ExtractionRegistry;
use crate::selector::{select_content, FileStage};

/// Turns an [`AnalyzeRequest`] into the bundle the reasoner receives.
///
/// Never fails: every decode or extraction problem ends up as sentinel text
/// in the bundle.
pub struct ContentPipeline {
    registry: ExtractionRegistry,
    max_decoded_bytes: usize,
}

impl ContentPipeline {
    pub fn new(registry: ExtractionRegistry) -> Self {
        Self {
            registry,
            max_decoded_bytes: MAX_DECODED_BYTES,
        }
    }

    /// Pipeline with every built-in strategy over `ocr`.
    pub fn with_ocr(ocr: Arc<dyn OcrBackend>) -> Self {
        Self::new(ExtractionRegistry::with_defaults(ocr))
    }

    /// Cap on decoded bytes; larger files are rejected before extraction.
    pub fn with_max_decoded_bytes(mut self, max_decoded_bytes: usize) -> Self {
        self.max_decoded_bytes = max_decoded_bytes;
        self
    }

    pub fn registry(&self) -> &ExtractionRegistry {
        &self.registry
    }

    /// Decode the file (if any), run its strategy, and select the content.
    pub async fn normalize(&self, request: &AnalyzeRequest) -> NormalizedContentBundle {
        let start = Instant::now();
        let stage = self.file_stage(request).await;
        let bundle = select_content(stage, &request.question, &request.file_type);

        info!(
            subsystem = "extract",
            file_type = %request.file_type,
            primary_content = bundle.primary().label(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Content normalized"
        );

        bundle
    }

    async fn file_stage(&self, request: &AnalyzeRequest) -> FileStage {
        let Some(uri) = request
            .file_data_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
        else {
            debug!(subsystem = "extract", "No file supplied");
            return FileStage::NoFile;
        };

        let decoded = match DataUri::parse(uri) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    op = "decode",
                    file_type = %request.file_type,
                    error = %e,
                    "Data URI rejected"
                );
                return FileStage::Rejected(format!("Invalid Data URI: {}.", e));
            }
        };

        if decoded.len() > self.max_decoded_bytes {
            warn!(
                subsystem = "extract",
                op = "decode",
                payload_bytes = decoded.len(),
                limit = self.max_decoded_bytes,
                "Decoded file over size limit"
            );
            return FileStage::Rejected(format!(
                "File too large to process: {} bytes exceeds the {} byte limit.",
                decoded.len(),
                self.max_decoded_bytes
            ));
        }

        let strategy = ExtractionStrategy::from_mime_type(&request.file_type);
        let (uri_mime, data) = decoded.into_parts();
        let mime_type = if uri_mime.is_empty() {
            request.file_type.clone()
        } else {
            uri_mime
        };

        debug!(
            subsystem = "extract",
            op = "extract",
            strategy = %strategy,
            file_type = %request.file_type,
            payload_bytes = data.len(),
            "Strategy selected"
        );

        let result = self.registry.extract(strategy, &data, &mime_type).await;

        FileStage::Extracted {
            result,
            media: MediaReference::new(mime_type, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::DataUri;
    use insight_inference::mock::MockOcrBackend;

    fn request(uri: Option<&str>, file_type: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            file_data_uri: uri.map(str::to_string),
            question: "What is this?".to_string(),
            file_type: file_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_uri_is_no_file() {
        let pipeline = ContentPipeline::with_ocr(Arc::new(MockOcrBackend::new()));
        let bundle = pipeline.normalize(&request(Some("  "), "image/png")).await;
        assert!(!bundle.file_supplied());
        assert_eq!(bundle.primary().label(), "none");
    }

    #[tokio::test]
    async fn test_not_base64_uri() {
        let pipeline = ContentPipeline::with_ocr(Arc::new(MockOcrBackend::new()));
        let bundle = pipeline
            .normalize(&request(Some("data:application/pdf,plain"), "application/pdf"))
            .await;
        assert_eq!(
            bundle.processed_text(),
            Some("Invalid Data URI: Only base64-encoded data URIs are supported.")
        );
    }

    #[tokio::test]
    async fn test_oversize_payload_rejected_before_extraction() {
        let ocr = MockOcrBackend::new().with_text("never");
        let pipeline =
            ContentPipeline::with_ocr(Arc::new(ocr.clone())).with_max_decoded_bytes(4);
        let uri = DataUri::encode("image/png", b"0123456789");

        let bundle = pipeline.normalize(&request(Some(&uri), "image/png")).await;
        assert_eq!(
            bundle.ocr_text(),
            Some("File too large to process: 10 bytes exceeds the 4 byte limit.")
        );
        assert_eq!(ocr.text_call_count(), 0);
    }

    #[tokio::test]
    async fn test_passthrough_media_uses_uri_mime() {
        let pipeline = ContentPipeline::with_ocr(Arc::new(MockOcrBackend::new()));
        let uri = DataUri::encode("text/plain", b"hello");

        let bundle = pipeline.normalize(&request(Some(&uri), "text/plain")).await;
        let media = bundle.media_reference().unwrap();
        assert_eq!(media.mime_type, "text/plain");
        assert_eq!(media.data, b"hello");
    }

    #[tokio::test]
    async fn test_media_falls_back_to_declared_mime() {
        let pipeline = ContentPipeline::with_ocr(Arc::new(MockOcrBackend::new()));
        let bundle = pipeline
            .normalize(&request(Some("data:;base64,aGk="), "application/json"))
            .await;
        assert_eq!(
            bundle.media_reference().unwrap().mime_type,
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_strategy_follows_declared_type_not_uri() {
        let ocr = MockOcrBackend::new().with_text("from ocr");
        let pipeline = ContentPipeline::with_ocr(Arc::new(ocr.clone()));
        let uri = DataUri::encode("text/plain", b"not really an image");

        let bundle = pipeline.normalize(&request(Some(&uri), "image/jpeg")).await;
        assert_eq!(bundle.ocr_text(), Some("from ocr"));
        assert_eq!(ocr.text_call_count(), 1);
    }
}
