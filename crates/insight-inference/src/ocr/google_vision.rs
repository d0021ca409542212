//! Google Cloud Vision OCR over the REST API.
//!
//! Images go to `images:annotate` with `TEXT_DETECTION`; PDFs go to
//! `files:annotate` with `DOCUMENT_TEXT_DETECTION` for the first few pages.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use insight_core::defaults;
use insight_core::{DocumentText, Error, OcrBackend, Result, TextDetection, TextRecognition};

/// Settings for the Google Vision backend.
#[derive(Debug, Clone)]
pub struct GoogleVisionConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    /// Pages OCR'd from a PDF.
    pub max_pages: u32,
}

impl GoogleVisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GOOGLE_VISION_URL.to_string(),
            api_key: api_key.into(),
            timeout_seconds: defaults::OCR_TIMEOUT_SECS,
            max_pages: defaults::PDF_OCR_MAX_PAGES,
        }
    }
}

pub struct GoogleVisionOcr {
    client: Client,
    config: GoogleVisionConfig,
}

impl GoogleVisionOcr {
    pub fn new(config: GoogleVisionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Ocr(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    /// Returns None if GOOGLE_VISION_API_KEY is not set.
    pub fn from_env() -> Option<Result<Self>> {
        let api_key = std::env::var(defaults::ENV_GOOGLE_VISION_API_KEY).ok()?;
        if api_key.is_empty() {
            return None;
        }
        let mut config = GoogleVisionConfig::new(api_key);
        if let Ok(url) = std::env::var(defaults::ENV_GOOGLE_VISION_URL) {
            config.base_url = url;
        }
        Some(Self::new(config))
    }

    async fn annotate<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Ocr(format!("Vision request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => "Unknown error".to_string(),
            };
            return Err(Error::Ocr(format!(
                "Vision API returned {}: {}",
                status, message
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Ocr(format!("Failed to parse vision response: {}", e)))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct BatchAnnotateImagesRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InputConfig {
    content: String,
    mime_type: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateFileRequest {
    input_config: InputConfig,
    features: Vec<Feature>,
    pages: Vec<u32>,
}

#[derive(Serialize)]
struct BatchAnnotateFilesRequest {
    requests: Vec<AnnotateFileRequest>,
}

#[derive(Deserialize, Default)]
struct Status {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Status,
}

#[derive(Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Deserialize)]
struct BatchAnnotateImagesResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateFileResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Deserialize)]
struct BatchAnnotateFilesResponse {
    #[serde(default)]
    responses: Vec<AnnotateFileResponse>,
}

fn encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

#[async_trait]
impl OcrBackend for GoogleVisionOcr {
    async fn recognize_text(&self, image: &[u8]) -> Result<TextRecognition> {
        let request = BatchAnnotateImagesRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: encode(image),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION",
                }],
            }],
        };

        let batch: BatchAnnotateImagesResponse = self.annotate("images:annotate", &request).await?;
        let response = batch.responses.into_iter().next().unwrap_or_default();

        if let Some(status) = response.error {
            return Err(Error::Ocr(status.message));
        }

        debug!(
            subsystem = "ocr",
            component = "google_vision",
            detections = response.text_annotations.len(),
            "Image OCR complete"
        );

        Ok(TextRecognition {
            detections: response
                .text_annotations
                .into_iter()
                .map(|a| TextDetection {
                    description: a.description,
                })
                .collect(),
        })
    }

    async fn recognize_document(&self, pdf: &[u8]) -> Result<DocumentText> {
        let request = BatchAnnotateFilesRequest {
            requests: vec![AnnotateFileRequest {
                input_config: InputConfig {
                    content: encode(pdf),
                    mime_type: defaults::MIME_PDF,
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION",
                }],
                pages: (1..=self.config.max_pages).collect(),
            }],
        };

        let batch: BatchAnnotateFilesResponse = self.annotate("files:annotate", &request).await?;
        let Some(file) = batch.responses.into_iter().next() else {
            return Ok(DocumentText { full_text: None });
        };

        if let Some(status) = file.error {
            return Err(Error::Ocr(status.message));
        }

        let mut pages = Vec::with_capacity(file.responses.len());
        for (i, page) in file.responses.into_iter().enumerate() {
            if let Some(status) = page.error {
                warn!(page = i + 1, error = %status.message, "Vision OCR failed for page, skipping");
                continue;
            }
            if let Some(annotation) = page.full_text_annotation {
                if !annotation.text.trim().is_empty() {
                    pages.push(annotation.text);
                }
            }
        }

        let full_text = pages.join("\n");
        Ok(DocumentText {
            full_text: (!full_text.is_empty()).then_some(full_text),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        // There is no cheap unauthenticated probe; configuration is the check.
        Ok(!self.config.api_key.is_empty())
    }

    fn name(&self) -> &str {
        "google_vision"
    }
}
