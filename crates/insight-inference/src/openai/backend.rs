//! OpenAI-compatible reasoner backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info, warn};

use insight_core::defaults;
use insight_core::{Error, MediaReference, ReasonerBackend, ReasonerPrompt, Result};

use super::error::{to_insight_error, OpenAIErrorCode};
use super::types::*;

/// Name of the structured-output schema sent with each request.
const SCHEMA_NAME: &str = "answer";

/// Configuration for the OpenAI-compatible reasoner.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::REASONER_URL.to_string(),
            api_key: None,
            timeout_seconds: defaults::REASONER_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

/// Reasoner backend speaking the chat completions protocol.
pub struct OpenAIReasoner {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIReasoner {
    /// Create a new reasoner with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "reasoner",
            component = "openai",
            url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing OpenAI-compatible reasoner"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig {
            base_url: std::env::var(defaults::ENV_REASONER_BASE_URL)
                .unwrap_or_else(|_| defaults::REASONER_URL.to_string()),
            api_key: std::env::var(defaults::ENV_REASONER_API_KEY)
                .or_else(|_| std::env::var(defaults::ENV_GEMINI_API_KEY))
                .ok(),
            timeout_seconds: std::env::var(defaults::ENV_REASONER_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REASONER_TIMEOUT_SECS),
            temperature: None,
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.url(endpoint));

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    fn build_get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(self.url(endpoint));

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req
    }

    /// Assemble the chat messages for one prompt.
    pub(crate) fn build_messages(prompt: &ReasonerPrompt<'_>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);

        if !prompt.system.is_empty() {
            messages.push(ChatMessage::system(prompt.system));
        }

        let content = match prompt.media {
            Some(media) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.text.to_string(),
                },
                media_part(media),
            ]),
            None => MessageContent::Text(prompt.text.to_string()),
        };
        messages.push(ChatMessage::user(content));

        messages
    }
}

/// Images go as `image_url` parts; anything else as an inline `file` part.
fn media_part(media: &MediaReference) -> ContentPart {
    let url = media.to_data_uri();
    if media.mime_type.starts_with("image/") {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url },
        }
    } else {
        ContentPart::File {
            file: FileData {
                filename: None,
                file_data: url,
            },
        }
    }
}

/// Parse the assistant message as a JSON object.
///
/// Tolerates a surrounding markdown code fence, which some providers add
/// even in structured-output mode.
pub fn parse_json_content(content: &str) -> Result<JsonValue> {
    let trimmed = strip_code_fence(content.trim());
    let value: JsonValue = serde_json::from_str(trimmed)?;

    if !value.is_object() {
        return Err(Error::Inference(
            "Reasoner returned JSON that is not an object".to_string(),
        ));
    }

    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[async_trait]
impl ReasonerBackend for OpenAIReasoner {
    async fn generate(
        &self,
        model: &str,
        prompt: &ReasonerPrompt<'_>,
        schema: &JsonValue,
    ) -> Result<JsonValue> {
        debug!(
            subsystem = "reasoner",
            component = "openai",
            model,
            prompt_len = prompt.text.len(),
            has_media = prompt.media.is_some(),
            "Generating structured answer"
        );

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: Self::build_messages(prompt),
            temperature: self.config.temperature,
            response_format: Some(ResponseFormat::json_schema(SCHEMA_NAME, schema.clone())),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| OpenAIErrorResponse::unknown());
            let code = OpenAIErrorCode::from_response(
                status.as_u16(),
                &body.error.error_type,
                &body.error.message,
            );
            return Err(to_insight_error(
                code,
                &format!("{} returned {}: {}", model, status, body.error.message),
            ));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Reasoner returned no content".to_string()))?;

        debug!(
            model,
            text_len = content.len(),
            "Generation complete"
        );

        parse_json_content(&content)
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .build_get_request("/models")
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Ok(true),
            Ok(resp) => {
                warn!(status = %resp.status(), "Reasoner health check failed");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Reasoner health check error");
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_target_gemini() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, defaults::REASONER_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_seconds, defaults::REASONER_TIMEOUT_SECS);
    }

    #[test]
    fn test_build_messages_text_only() {
        let prompt = ReasonerPrompt {
            system: "sys",
            text: "question",
            media: None,
        };
        let messages = OpenAIReasoner::build_messages(&prompt);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(matches!(messages[1].content, MessageContent::Text(ref t) if t == "question"));
    }

    #[test]
    fn test_build_messages_skips_empty_system() {
        let prompt = ReasonerPrompt {
            system: "",
            text: "question",
            media: None,
        };
        let messages = OpenAIReasoner::build_messages(&prompt);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_image_media_becomes_image_url_part() {
        let media = MediaReference::new("image/gif", vec![1, 2, 3]);
        assert!(matches!(media_part(&media), ContentPart::ImageUrl { .. }));
    }

    #[test]
    fn test_document_media_becomes_file_part() {
        let media = MediaReference::new("text/plain", b"hello".to_vec());
        match media_part(&media) {
            ContentPart::File { file } => {
                assert_eq!(file.file_data, "data:text/plain;base64,aGVsbG8=")
            }
            other => panic!("Expected file part, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_content_plain() {
        let value = parse_json_content(r#"{"answer": "42"}"#).unwrap();
        assert_eq!(value["answer"], "42");
    }

    #[test]
    fn test_parse_json_content_fenced() {
        let value = parse_json_content("```json\n{\"answer\": \"42\"}\n```").unwrap();
        assert_eq!(value["answer"], "42");
    }

    #[test]
    fn test_parse_json_content_rejects_non_object() {
        let err = parse_json_content("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_parse_json_content_rejects_prose() {
        let err = parse_json_content("I cannot answer that.").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
