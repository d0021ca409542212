//! Core traits for InsightFlow abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// OCR TRAITS
// =============================================================================

/// One text region found by image OCR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetection {
    pub description: String,
}

/// Ordered detections for an image. The first entry holds the full text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecognition {
    pub detections: Vec<TextDetection>,
}

impl TextRecognition {
    /// Full text of the first detection, if non-blank.
    pub fn full_text(&self) -> Option<&str> {
        self.detections
            .first()
            .map(|d| d.description.as_str())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Text recognized in a multi-page document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    pub full_text: Option<String>,
}

impl DocumentText {
    pub fn non_blank(&self) -> Option<&str> {
        self.full_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Backend for optical character recognition.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Recognize text in a PNG or JPEG image.
    async fn recognize_text(&self, image: &[u8]) -> Result<TextRecognition>;

    /// Recognize text in a PDF document.
    async fn recognize_document(&self, pdf: &[u8]) -> Result<DocumentText>;

    /// Check if the backend is available.
    async fn health_check(&self) -> Result<bool>;

    /// Backend identifier for logs and health output.
    fn name(&self) -> &str;
}

// =============================================================================
// REASONER TRAITS
// =============================================================================

/// Prompt for one reasoner attempt.
#[derive(Debug, Clone, Copy)]
pub struct ReasonerPrompt<'a> {
    pub system: &'a str,
    pub text: &'a str,
    /// Raw document attached alongside the text.
    pub media: Option<&'a MediaReference>,
}

/// Backend for structured-output language model calls.
#[async_trait]
pub trait ReasonerBackend: Send + Sync {
    /// Generate a JSON object conforming to `schema`.
    async fn generate(
        &self,
        model: &str,
        prompt: &ReasonerPrompt<'_>,
        schema: &JsonValue,
    ) -> Result<JsonValue>;

    /// Check if the backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Backend identifier for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// EXTRACTION ADAPTER TRAITS
// =============================================================================

/// Adapter for extracting content from an uploaded file.
///
/// Each adapter handles one extraction strategy. Adapters are registered in an
/// `ExtractionRegistry` and dispatched from the declared file type. Extraction
/// never fails: problems are reported as sentinel text in the result.
#[async_trait]
pub trait ExtractionAdapter: Send + Sync {
    /// The extraction strategy this adapter handles.
    fn strategy(&self) -> ExtractionStrategy;

    /// Extract content from decoded file bytes.
    async fn extract(&self, data: &[u8], mime_type: &str) -> ExtractionResult;

    /// Check if the adapter's external dependencies are available.
    async fn health_check(&self) -> Result<bool>;

    /// Human-readable name of this adapter.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_uses_first_detection() {
        let recognition = TextRecognition {
            detections: vec![
                TextDetection {
                    description: "Hello World".to_string(),
                },
                TextDetection {
                    description: "Hello".to_string(),
                },
            ],
        };
        assert_eq!(recognition.full_text(), Some("Hello World"));
    }

    #[test]
    fn test_full_text_blank_is_none() {
        let recognition = TextRecognition {
            detections: vec![TextDetection {
                description: "  \n".to_string(),
            }],
        };
        assert!(recognition.full_text().is_none());
        assert!(TextRecognition::default().full_text().is_none());
    }

    #[test]
    fn test_document_text_non_blank() {
        let doc = DocumentText {
            full_text: Some("  ".to_string()),
        };
        assert!(doc.non_blank().is_none());

        let doc = DocumentText {
            full_text: Some("page one".to_string()),
        };
        assert_eq!(doc.non_blank(), Some("page one"));
    }
}
