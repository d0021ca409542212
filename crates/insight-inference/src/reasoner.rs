//! Reasoner adapter: ordered fallback over structured-output model calls.
//!
//! Each [`ReasonerConfig`] is tried in order. An attempt fails on transport
//! or HTTP errors, on unparsable output, and on output without an `answer`.
//! When every attempt fails the caller gets a static apology, never an error.

use std::sync::Arc;
use std::time::Instant;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error, info, warn};

use insight_core::defaults;
use insight_core::{
    AnswerResult, Error, NormalizedContentBundle, ReasonerBackend, ReasonerPrompt, Result,
};

use crate::prompt::PromptTemplate;

/// Shape the model is asked to produce.
///
/// Only used to derive the JSON schema; responses are read field by field so
/// a malformed `sources` can be replaced instead of failing the attempt.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReasonerAnswer {
    /// The answer to the user's question.
    pub answer: String,
    /// Sources cited in the answer.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    /// Whether the user asked for a chart or image drawn from the document.
    #[serde(default)]
    pub requires_image_generation: bool,
    /// Prompt for the image generator when one is required.
    #[serde(default)]
    pub image_generation_prompt: Option<String>,
}

/// JSON schema for [`ReasonerAnswer`], without the `$schema` marker that
/// some OpenAI-compatible endpoints reject.
pub fn answer_schema() -> Result<JsonValue> {
    let mut schema = serde_json::to_value(schemars::schema_for!(ReasonerAnswer))?;
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }
    Ok(schema)
}

/// One attempt in the fallback chain.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Short name for logs, e.g. "fast".
    pub label: String,
    pub model: String,
    pub template: PromptTemplate,
}

impl ReasonerConfig {
    pub fn new(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            template: PromptTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }
}

/// Default chain: fast model first, then the stronger fallback.
pub fn default_configs(fast_model: &str, fallback_model: &str) -> Vec<ReasonerConfig> {
    vec![
        ReasonerConfig::new("fast", fast_model),
        ReasonerConfig::new("fallback", fallback_model),
    ]
}

/// Answers questions about normalized file content.
#[derive(Clone)]
pub struct Reasoner {
    backend: Arc<dyn ReasonerBackend>,
    configs: Vec<ReasonerConfig>,
}

impl Reasoner {
    pub fn new(backend: Arc<dyn ReasonerBackend>, configs: Vec<ReasonerConfig>) -> Self {
        Self { backend, configs }
    }

    /// Reasoner with the built-in fast and fallback models.
    pub fn with_default_models(backend: Arc<dyn ReasonerBackend>) -> Self {
        Self::new(
            backend,
            default_configs(
                defaults::REASONER_FAST_MODEL,
                defaults::REASONER_FALLBACK_MODEL,
            ),
        )
    }

    pub fn configs(&self) -> &[ReasonerConfig] {
        &self.configs
    }

    /// Model ids in attempt order.
    pub fn models(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.model.as_str()).collect()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }

    /// Answer the bundle's question, falling back through every config.
    pub async fn answer(&self, bundle: &NormalizedContentBundle) -> AnswerResult {
        for (attempt, config) in self.configs.iter().enumerate() {
            let start = Instant::now();
            match self.attempt(config, bundle).await {
                Ok(answer) => {
                    info!(
                        subsystem = "reasoner",
                        attempt,
                        label = %config.label,
                        model = %config.model,
                        duration_ms = start.elapsed().as_millis() as u64,
                        success = true,
                        "Reasoner attempt succeeded"
                    );
                    return answer;
                }
                Err(e) => {
                    warn!(
                        subsystem = "reasoner",
                        attempt,
                        label = %config.label,
                        model = %config.model,
                        duration_ms = start.elapsed().as_millis() as u64,
                        success = false,
                        error = %e,
                        "Reasoner attempt failed"
                    );
                }
            }
        }

        error!(
            subsystem = "reasoner",
            attempts = self.configs.len(),
            "All reasoner attempts failed, returning apology"
        );
        AnswerResult::apology()
    }

    async fn attempt(
        &self,
        config: &ReasonerConfig,
        bundle: &NormalizedContentBundle,
    ) -> Result<AnswerResult> {
        let text = config.template.render(bundle);
        let prompt = ReasonerPrompt {
            system: &config.template.system,
            text: &text,
            media: bundle.media_reference(),
        };
        let schema = answer_schema()?;

        let value = self
            .backend
            .generate(&config.model, &prompt, &schema)
            .await?;
        interpret_answer(&value, bundle.file_supplied())
    }
}

/// Turn raw model output into an [`AnswerResult`].
///
/// Missing or non-string `answer` is an error. Missing or malformed
/// `sources` becomes `["Uploaded Document"]` when a file was supplied.
pub fn interpret_answer(value: &JsonValue, file_supplied: bool) -> Result<AnswerResult> {
    let answer = value
        .get("answer")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::Inference("Reasoner response has no 'answer' string".to_string()))?;

    let sources = value
        .get("sources")
        .and_then(JsonValue::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|s| s.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });
    let sources = match sources {
        Some(sources) => sources,
        None => {
            debug!(file_supplied, "Reasoner omitted sources, substituting default");
            default_sources(file_supplied)
        }
    };

    let requires_image_generation = value
        .get("requiresImageGeneration")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let image_generation_prompt = value
        .get("imageGenerationPrompt")
        .and_then(JsonValue::as_str)
        .filter(|p| requires_image_generation && !p.trim().is_empty())
        .map(str::to_string);

    Ok(AnswerResult {
        answer: answer.to_string(),
        sources,
        requires_image_generation,
        image_generation_prompt,
        generated_image_uri: None,
    })
}

fn default_sources(file_supplied: bool) -> Vec<String> {
    if file_supplied {
        vec![defaults::UPLOADED_DOCUMENT_SOURCE.to_string()]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockReasonerBackend;
    use insight_core::{MediaReference, PrimaryContent};
    use serde_json::json;

    fn bundle(file_supplied: bool) -> NormalizedContentBundle {
        let primary = if file_supplied {
            PrimaryContent::ProcessedText("Contents of ZIP file:\n- a.txt (file)".to_string())
        } else {
            PrimaryContent::None
        };
        NormalizedContentBundle::new("What is inside?", "application/zip", file_supplied, primary)
    }

    #[test]
    fn test_answer_schema_requires_answer() {
        let schema = answer_schema().unwrap();
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].get("answer").is_some());
        assert!(schema["properties"].get("requiresImageGeneration").is_some());
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("answer")));
    }

    #[test]
    fn test_interpret_full_answer() {
        let value = json!({
            "answer": "A chart would help",
            "sources": ["Page 2"],
            "requiresImageGeneration": true,
            "imageGenerationPrompt": "A bar chart of sales"
        });
        let result = interpret_answer(&value, true).unwrap();
        assert_eq!(result.answer, "A chart would help");
        assert_eq!(result.sources, vec!["Page 2"]);
        assert!(result.requires_image_generation);
        assert_eq!(result.image_generation_prompt.as_deref(), Some("A bar chart of sales"));
        assert!(result.generated_image_uri.is_none());
    }

    #[test]
    fn test_interpret_missing_answer_is_error() {
        let err = interpret_answer(&json!({"sources": []}), true).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_interpret_missing_sources_with_file() {
        let result = interpret_answer(&json!({"answer": "x"}), true).unwrap();
        assert_eq!(result.sources, vec!["Uploaded Document"]);
    }

    #[test]
    fn test_interpret_missing_sources_without_file() {
        let result = interpret_answer(&json!({"answer": "x"}), false).unwrap();
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_interpret_malformed_sources() {
        let result = interpret_answer(&json!({"answer": "x", "sources": "doc"}), true).unwrap();
        assert_eq!(result.sources, vec!["Uploaded Document"]);
        let result = interpret_answer(&json!({"answer": "x", "sources": [1, 2]}), true).unwrap();
        assert_eq!(result.sources, vec!["Uploaded Document"]);
    }

    #[test]
    fn test_interpret_empty_sources_kept() {
        let result = interpret_answer(&json!({"answer": "x", "sources": []}), true).unwrap();
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_interpret_drops_prompt_without_flag() {
        let value = json!({"answer": "x", "requiresImageGeneration": false, "imageGenerationPrompt": "chart"});
        assert!(interpret_answer(&value, true).unwrap().image_generation_prompt.is_none());
    }

    #[test]
    fn test_interpret_drops_blank_prompt() {
        let value = json!({"answer": "x", "requiresImageGeneration": true, "imageGenerationPrompt": "  "});
        let result = interpret_answer(&value, true).unwrap();
        assert!(result.requires_image_generation);
        assert!(result.image_generation_prompt.is_none());
    }

    #[tokio::test]
    async fn test_first_attempt_success_skips_fallback() {
        let backend = MockReasonerBackend::new().with_response(json!({"answer": "fast answer"}));
        let reasoner = Reasoner::with_default_models(Arc::new(backend.clone()));

        let result = reasoner.answer(&bundle(true)).await;
        assert_eq!(result.answer, "fast answer");
        assert_eq!(backend.models_called(), vec!["gemini-2.0-flash"]);
    }

    #[tokio::test]
    async fn test_fallback_after_failure() {
        let backend = MockReasonerBackend::new()
            .with_failure("rate limited")
            .with_response(json!({"answer": "fallback answer"}));
        let reasoner = Reasoner::with_default_models(Arc::new(backend.clone()));

        let result = reasoner.answer(&bundle(true)).await;
        assert_eq!(result.answer, "fallback answer");
        assert_eq!(
            backend.models_called(),
            vec!["gemini-2.0-flash", "gemini-1.5-pro"]
        );
    }

    #[tokio::test]
    async fn test_missing_answer_triggers_fallback() {
        let backend = MockReasonerBackend::new()
            .with_response(json!({"sources": ["x"]}))
            .with_response(json!({"answer": "second"}));
        let reasoner = Reasoner::with_default_models(Arc::new(backend.clone()));

        let result = reasoner.answer(&bundle(true)).await;
        assert_eq!(result.answer, "second");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_all_attempts_fail_returns_apology() {
        let backend = MockReasonerBackend::new()
            .with_failure("down")
            .with_failure("still down");
        let reasoner = Reasoner::with_default_models(Arc::new(backend.clone()));

        let result = reasoner.answer(&bundle(true)).await;
        assert_eq!(result, AnswerResult::apology());
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_configs_returns_apology() {
        let backend = MockReasonerBackend::new();
        let reasoner = Reasoner::new(Arc::new(backend.clone()), Vec::new());

        let result = reasoner.answer(&bundle(false)).await;
        assert_eq!(result.answer, defaults::APOLOGY_ANSWER);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_each_attempt_renders_its_own_template() {
        let backend = MockReasonerBackend::new()
            .with_failure("nope")
            .with_response(json!({"answer": "ok"}));
        let configs = vec![
            ReasonerConfig::new("a", "model-a")
                .with_template(PromptTemplate::new("sys-a", "A: {{question}}")),
            ReasonerConfig::new("b", "model-b")
                .with_template(PromptTemplate::new("sys-b", "B: {{question}}")),
        ];
        let reasoner = Reasoner::new(Arc::new(backend.clone()), configs);

        reasoner.answer(&bundle(true)).await;
        let calls = backend.get_calls();
        assert_eq!(calls[0].system, "sys-a");
        assert_eq!(calls[0].text, "A: What is inside?");
        assert_eq!(calls[1].system, "sys-b");
        assert_eq!(calls[1].text, "B: What is inside?");
    }

    #[tokio::test]
    async fn test_media_forwarded_for_raw_document() {
        let backend = MockReasonerBackend::new().with_response(json!({"answer": "ok"}));
        let reasoner = Reasoner::with_default_models(Arc::new(backend.clone()));
        let media = MediaReference::new("text/plain", b"hello".to_vec());
        let bundle = NormalizedContentBundle::new(
            "Summarize",
            "text/plain",
            true,
            PrimaryContent::RawDocument(media.clone()),
        );

        reasoner.answer(&bundle).await;
        assert_eq!(backend.get_calls()[0].media, Some(media));
    }
}
