//! Mock OCR and reasoner backends for deterministic testing.
//!
//! Both mocks record every call and are cheap to clone; clones share the
//! call log and reply queue, so a test can hand one clone to the code under
//! test and assert on the other.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use insight_inference::mock::{MockOcrBackend, MockReasonerBackend};
//! use serde_json::json;
//!
//! let ocr = MockOcrBackend::new().with_text("Hello World");
//! let reasoner = MockReasonerBackend::new()
//!     .with_failure("rate limited")
//!     .with_response(json!({"answer": "42"}));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use insight_core::{
    DocumentText, Error, MediaReference, OcrBackend, ReasonerBackend, ReasonerPrompt, Result,
    TextDetection, TextRecognition,
};

// =============================================================================
// OCR
// =============================================================================

#[derive(Debug, Clone)]
enum OcrReply {
    Text(TextRecognition),
    Document(DocumentText),
    Failure(String),
}

#[derive(Debug, Clone)]
struct MockOcrConfig {
    text: OcrReply,
    document: OcrReply,
}

impl Default for MockOcrConfig {
    fn default() -> Self {
        Self {
            text: OcrReply::Text(TextRecognition::default()),
            document: OcrReply::Document(DocumentText::default()),
        }
    }
}

/// A recorded OCR call.
#[derive(Debug, Clone)]
pub struct MockOcrCall {
    pub operation: &'static str,
    pub input_len: usize,
    pub timestamp: std::time::Instant,
}

/// Mock OCR backend with fixed replies.
#[derive(Clone, Default)]
pub struct MockOcrBackend {
    config: Arc<MockOcrConfig>,
    call_log: Arc<Mutex<Vec<MockOcrCall>>>,
}

impl MockOcrBackend {
    /// Backend that finds no text anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image OCR returns `text` as the first (full-text) detection.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut detections = vec![TextDetection {
            description: text.clone(),
        }];
        detections.extend(text.split_whitespace().map(|word| TextDetection {
            description: word.to_string(),
        }));
        Arc::make_mut(&mut self.config).text = OcrReply::Text(TextRecognition { detections });
        self
    }

    /// Image OCR fails with `message`.
    pub fn with_text_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).text = OcrReply::Failure(message.into());
        self
    }

    /// Document OCR returns `text`.
    pub fn with_document_text(mut self, text: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).document = OcrReply::Document(DocumentText {
            full_text: Some(text.into()),
        });
        self
    }

    /// Document OCR fails with `message`.
    pub fn with_document_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).document = OcrReply::Failure(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockOcrCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn text_call_count(&self) -> usize {
        self.count("recognize_text")
    }

    pub fn document_call_count(&self) -> usize {
        self.count("recognize_document")
    }

    fn count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn log_call(&self, operation: &'static str, input: &[u8]) {
        self.call_log.lock().unwrap().push(MockOcrCall {
            operation,
            input_len: input.len(),
            timestamp: std::time::Instant::now(),
        });
    }
}

#[async_trait]
impl OcrBackend for MockOcrBackend {
    async fn recognize_text(&self, image: &[u8]) -> Result<TextRecognition> {
        self.log_call("recognize_text", image);
        match &self.config.text {
            OcrReply::Text(recognition) => Ok(recognition.clone()),
            OcrReply::Failure(message) => Err(Error::Ocr(message.clone())),
            OcrReply::Document(_) => Ok(TextRecognition::default()),
        }
    }

    async fn recognize_document(&self, pdf: &[u8]) -> Result<DocumentText> {
        self.log_call("recognize_document", pdf);
        match &self.config.document {
            OcrReply::Document(doc) => Ok(doc.clone()),
            OcrReply::Failure(message) => Err(Error::Ocr(message.clone())),
            OcrReply::Text(_) => Ok(DocumentText::default()),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// REASONER
// =============================================================================

#[derive(Debug, Clone)]
enum ReasonerReply {
    Value(JsonValue),
    Failure(String),
}

/// A recorded reasoner call.
#[derive(Debug, Clone)]
pub struct MockReasonerCall {
    pub model: String,
    pub system: String,
    pub text: String,
    pub media: Option<MediaReference>,
    pub schema: JsonValue,
}

/// Mock reasoner that replays queued replies in order.
///
/// Once the queue is empty every call returns the default response.
#[derive(Clone)]
pub struct MockReasonerBackend {
    replies: Arc<Mutex<VecDeque<ReasonerReply>>>,
    default_response: Arc<JsonValue>,
    call_log: Arc<Mutex<Vec<MockReasonerCall>>>,
}

impl Default for MockReasonerBackend {
    fn default() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Arc::new(json!({"answer": "Mock response"})),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockReasonerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_response(self, value: JsonValue) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ReasonerReply::Value(value));
        self
    }

    /// Queue a failed reply.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ReasonerReply::Failure(message.into()));
        self
    }

    /// Reply used once the queue is drained.
    pub fn with_default_response(mut self, value: JsonValue) -> Self {
        self.default_response = Arc::new(value);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockReasonerCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Models in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.model.clone())
            .collect()
    }
}

#[async_trait]
impl ReasonerBackend for MockReasonerBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &ReasonerPrompt<'_>,
        schema: &JsonValue,
    ) -> Result<JsonValue> {
        self.call_log.lock().unwrap().push(MockReasonerCall {
            model: model.to_string(),
            system: prompt.system.to_string(),
            text: prompt.text.to_string(),
            media: prompt.media.cloned(),
            schema: schema.clone(),
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ReasonerReply::Value(value)) => Ok(value),
            Some(ReasonerReply::Failure(message)) => Err(Error::Inference(message)),
            None => Ok((*self.default_response).clone()),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ocr_text() {
        let ocr = MockOcrBackend::new().with_text("Hello World");
        let result = ocr.recognize_text(b"img").await.unwrap();
        assert_eq!(result.full_text(), Some("Hello World"));
        assert_eq!(result.detections.len(), 3);
        assert_eq!(ocr.text_call_count(), 1);
        assert_eq!(ocr.document_call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_ocr_defaults_to_no_text() {
        let ocr = MockOcrBackend::new();
        assert!(ocr.recognize_text(b"img").await.unwrap().detections.is_empty());
        assert!(ocr.recognize_document(b"pdf").await.unwrap().full_text.is_none());
    }

    #[tokio::test]
    async fn test_mock_ocr_failure() {
        let ocr = MockOcrBackend::new().with_document_failure("quota");
        let err = ocr.recognize_document(b"pdf").await.unwrap_err();
        assert_eq!(err.to_string(), "OCR error: quota");
        assert_eq!(ocr.get_calls()[0].input_len, 3);
    }

    #[tokio::test]
    async fn test_mock_reasoner_replays_in_order() {
        let reasoner = MockReasonerBackend::new()
            .with_failure("boom")
            .with_response(json!({"answer": "second"}));
        let prompt = ReasonerPrompt {
            system: "",
            text: "q",
            media: None,
        };
        let schema = json!({});

        assert!(reasoner.generate("a", &prompt, &schema).await.is_err());
        let value = reasoner.generate("b", &prompt, &schema).await.unwrap();
        assert_eq!(value["answer"], "second");
        let value = reasoner.generate("c", &prompt, &schema).await.unwrap();
        assert_eq!(value["answer"], "Mock response");
        assert_eq!(reasoner.models_called(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mock_reasoner_clones_share_log() {
        let reasoner = MockReasonerBackend::new();
        let clone = reasoner.clone();
        let prompt = ReasonerPrompt {
            system: "",
            text: "q",
            media: None,
        };
        clone.generate("m", &prompt, &json!({})).await.unwrap();
        assert_eq!(reasoner.call_count(), 1);
    }
}
