//! PdfText extraction adapter: direct text extraction with document OCR as
//! fallback.
//!
//! Stage 1 reads the PDF's text layer. If the trimmed text has at least
//! `min_direct_chars` characters it is accepted and OCR never runs. Otherwise
//! stage 2 OCRs the document. A weaker result is only replaced by a strictly
//! better one:
//!
//! | Stage 1 | OCR | Result |
//! |---|---|---|
//! | long | not run | stage 1 text |
//! | short or empty | text | OCR text |
//! | short | no text | stage 1 text |
//! | empty or failed | no text | "No text found in PDF by OCR ..." |
//! | short | error | stage 1 text + " (OCR also attempted and failed: ...)" |
//! | empty or failed | error | "PDF OCR processing failed: ..." |

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use insight_core::defaults::{NO_TEXT_IN_PDF, PDF_DIRECT_TEXT_MIN_CHARS};
use insight_core::{
    Error, ExtractionAdapter, ExtractionOutcome, ExtractionResult, ExtractionStrategy, OcrBackend,
    Result,
};

use super::cause;

/// Source of a PDF's embedded text layer.
#[async_trait]
pub trait PdfTextSource: Send + Sync {
    async fn extract_text(&self, pdf: &[u8]) -> Result<String>;

    fn name(&self) -> &str;
}

/// Text layer extraction with the `pdf-extract` crate.
///
/// `pdf-extract` can panic on malformed fonts; panics are contained and
/// reported as extraction errors.
pub struct PdfExtractSource;

#[async_trait]
impl PdfTextSource for PdfExtractSource {
    async fn extract_text(&self, pdf: &[u8]) -> Result<String> {
        let bytes = pdf.to_vec();
        let joined = tokio::task::spawn_blocking(move || {
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                pdf_extract::extract_text_from_mem(&bytes)
            }))
        })
        .await
        .map_err(|e| Error::Internal(format!("PDF task failed: {}", e)))?;

        match joined {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Error::Extraction(e.to_string())),
            Err(_panic) => Err(Error::Extraction(
                "PDF parser panicked on malformed content".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Adapter for PDF files.
pub struct PdfTextAdapter {
    source: Arc<dyn PdfTextSource>,
    ocr: Arc<dyn OcrBackend>,
    min_direct_chars: usize,
}

impl PdfTextAdapter {
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self {
            source: Arc::new(PdfExtractSource),
            ocr,
            min_direct_chars: PDF_DIRECT_TEXT_MIN_CHARS,
        }
    }

    /// Replace the text layer source.
    pub fn with_source(mut self, source: Arc<dyn PdfTextSource>) -> Self {
        self.source = source;
        self
    }

    /// Minimum trimmed character count at which direct text skips OCR.
    pub fn with_min_direct_chars(mut self, min_direct_chars: usize) -> Self {
        self.min_direct_chars = min_direct_chars;
        self
    }

    pub fn min_direct_chars(&self) -> usize {
        self.min_direct_chars
    }

    /// Stage 1. `None` when extraction failed or found only whitespace.
    async fn direct_text(&self, data: &[u8]) -> Option<String> {
        match self.source.extract_text(data).await {
            Ok(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    component = "pdf_text",
                    source = self.source.name(),
                    error = %e,
                    "Direct PDF text extraction failed, trying OCR"
                );
                None
            }
        }
    }
}

#[async_trait]
impl ExtractionAdapter for PdfTextAdapter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::PdfText
    }

    async fn extract(&self, data: &[u8], _mime_type: &str) -> ExtractionResult {
        let direct = self.direct_text(data).await;
        let direct_chars = direct.as_deref().map_or(0, |t| t.chars().count());

        if let Some(text) = direct.as_ref().filter(|_| direct_chars >= self.min_direct_chars) {
            debug!(
                subsystem = "extract",
                component = "pdf_text",
                text_len = direct_chars,
                "Direct PDF text accepted"
            );
            return ExtractionResult::processed(text.clone(), ExtractionOutcome::Ok);
        }

        debug!(
            subsystem = "extract",
            component = "pdf_text",
            text_len = direct_chars,
            threshold = self.min_direct_chars,
            "Direct PDF text insufficient, running document OCR"
        );

        match self.ocr.recognize_document(data).await {
            Ok(document) => match (document.non_blank(), direct) {
                (Some(ocr_text), _) => {
                    debug!(
                        subsystem = "extract",
                        component = "pdf_text",
                        text_len = ocr_text.len(),
                        "PDF OCR produced text"
                    );
                    ExtractionResult::processed(ocr_text, ExtractionOutcome::Ok)
                }
                (None, Some(short)) => ExtractionResult::processed(short, ExtractionOutcome::Ok),
                (None, None) => ExtractionResult::processed(NO_TEXT_IN_PDF, ExtractionOutcome::Empty),
            },
            Err(e) => {
                let message = cause(&e);
                warn!(
                    subsystem = "extract",
                    component = "pdf_text",
                    backend = self.ocr.name(),
                    retained_direct_text = direct.is_some(),
                    error = %e,
                    "PDF OCR failed"
                );
                match direct {
                    Some(short) => ExtractionResult::processed(
                        format!("{} (OCR also attempted and failed: {})", short, message),
                        ExtractionOutcome::Ok,
                    )
                    .with_diagnostic(format!("PDF OCR processing failed: {}", message)),
                    None => ExtractionResult::processed(
                        format!("PDF OCR processing failed: {}", message),
                        ExtractionOutcome::Failed,
                    ),
                }
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        self.ocr.health_check().await
    }

    fn name(&self) -> &str {
        "pdf_text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_inference::mock::MockOcrBackend;

    /// Text layer source returning a fixed result.
    struct FixedSource(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl PdfTextSource for FixedSource {
        async fn extract_text(&self, _pdf: &[u8]) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| Error::Extraction(e.to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn adapter(source: FixedSource, ocr: &MockOcrBackend) -> PdfTextAdapter {
        PdfTextAdapter::new(Arc::new(ocr.clone())).with_source(Arc::new(source))
    }

    const LONG_TEXT: &str = "Quarterly report. Revenue grew twelve percent year over year, \
        driven by strong subscription renewals and new enterprise contracts in Europe.";

    #[tokio::test]
    async fn test_long_direct_text_skips_ocr() {
        assert!(LONG_TEXT.chars().count() >= PDF_DIRECT_TEXT_MIN_CHARS);
        let ocr = MockOcrBackend::new().with_document_text("should not be used");
        let result = adapter(FixedSource(Ok(LONG_TEXT)), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(result.text(), Some(LONG_TEXT));
        assert_eq!(ocr.document_call_count(), 0);
    }

    #[tokio::test]
    async fn test_ocr_overrides_short_text() {
        let ocr = MockOcrBackend::new().with_document_text("Scanned page text");
        let result = adapter(FixedSource(Ok("Title")), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(result.text(), Some("Scanned page text"));
        assert_eq!(ocr.document_call_count(), 1);
    }

    #[tokio::test]
    async fn test_short_text_retained_when_ocr_finds_nothing() {
        let ocr = MockOcrBackend::new();
        let result = adapter(FixedSource(Ok("  Short text\n")), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(result.text(), Some("Short text"));
        assert_eq!(result.outcome(), ExtractionOutcome::Ok);
    }

    #[tokio::test]
    async fn test_no_text_anywhere() {
        let ocr = MockOcrBackend::new();
        let result = adapter(FixedSource(Ok("   ")), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(result.text(), Some(NO_TEXT_IN_PDF));
        assert_eq!(result.outcome(), ExtractionOutcome::Empty);
    }

    #[tokio::test]
    async fn test_direct_failure_and_ocr_failure() {
        let ocr = MockOcrBackend::new().with_document_failure("quota exceeded");
        let result = adapter(FixedSource(Err("bad xref")), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(
            result.text(),
            Some("PDF OCR processing failed: quota exceeded")
        );
        assert_eq!(result.outcome(), ExtractionOutcome::Failed);
    }

    #[tokio::test]
    async fn test_short_text_kept_when_ocr_fails() {
        let ocr = MockOcrBackend::new().with_document_failure("quota exceeded");
        let result = adapter(FixedSource(Ok("Short text")), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(
            result.text(),
            Some("Short text (OCR also attempted and failed: quota exceeded)")
        );
        assert_eq!(
            result.diagnostic(),
            Some("PDF OCR processing failed: quota exceeded")
        );
    }

    #[tokio::test]
    async fn test_threshold_is_tunable() {
        let ocr = MockOcrBackend::new().with_document_text("ocr");
        let result = adapter(FixedSource(Ok("Short text")), &ocr)
            .with_min_direct_chars(5)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(result.text(), Some("Short text"));
        assert_eq!(ocr.document_call_count(), 0);
    }

    #[tokio::test]
    async fn test_threshold_counts_characters_not_bytes() {
        // 60 two-byte characters: 120 bytes but under the 100-character threshold.
        let text: &'static str = Box::leak("é".repeat(60).into_boxed_str());
        let ocr = MockOcrBackend::new();
        let result = adapter(FixedSource(Ok(text)), &ocr)
            .extract(b"%PDF", "application/pdf")
            .await;

        assert_eq!(ocr.document_call_count(), 1);
        assert_eq!(result.text(), Some(text));
    }

    #[tokio::test]
    async fn test_pdf_extract_on_garbage_falls_back_to_ocr() {
        let ocr = MockOcrBackend::new().with_document_text("OCR rescued text");
        let adapter = PdfTextAdapter::new(Arc::new(ocr.clone()));

        let result = adapter.extract(b"definitely not a pdf", "application/pdf").await;
        assert_eq!(result.text(), Some("OCR rescued text"));
        assert_eq!(ocr.document_call_count(), 1);
    }
}
