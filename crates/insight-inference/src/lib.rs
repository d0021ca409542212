//! # insight-inference
//!
//! OCR and reasoning backends for InsightFlow.
//!
//! This crate provides:
//! - OCR backends: Google Cloud Vision (REST) and local Tesseract
//! - An OpenAI-compatible reasoner backend with JSON-schema structured output
//!   (feature `openai`)
//! - Prompt templates and the ordered model fallback chain
//! - TOML/environment configuration that builds the configured backends
//!
//! # Feature Flags
//!
//! - `openai` (default): Enable the OpenAI-compatible reasoner backend
//! - `mock`: Expose deterministic mock backends to downstream test suites
//!
//! # Example
//!
//! ```rust,no_run
//! use insight_inference::InferenceConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = InferenceConfig::load().unwrap();
//!     let ocr = config.build_ocr_backend().unwrap();
//!     let reasoner = config.build_reasoner().unwrap();
//!     println!("{} / {:?}", ocr.name(), reasoner.models());
//! }
//! ```

pub mod config;
pub mod ocr;
pub mod prompt;
pub mod reasoner;

#[cfg(feature = "openai")]
pub mod openai;

// Mock backends for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{
    ConfigError, ConfigResult, GoogleVisionSettings, InferenceConfig, OcrBackendKind,
    ReasonerSettings, TesseractSettings,
};
pub use ocr::{DisabledOcr, GoogleVisionConfig, GoogleVisionOcr, TesseractConfig, TesseractOcr};
pub use prompt::{PromptTemplate, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE};
pub use reasoner::{
    answer_schema, default_configs, interpret_answer, Reasoner, ReasonerAnswer, ReasonerConfig,
};

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIReasoner};
