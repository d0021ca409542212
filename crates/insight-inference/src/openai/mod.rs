//! OpenAI-compatible reasoner backend.
//!
//! Works with any endpoint that implements chat completions with
//! `response_format: json_schema`, including:
//!
//! - Gemini's OpenAI compatibility layer (default)
//! - OpenAI cloud API
//! - Ollama, vLLM, LM Studio (OpenAI compatibility mode)
//!
//! # Example
//!
//! ```rust,no_run
//! use insight_core::{ReasonerBackend, ReasonerPrompt};
//! use insight_inference::openai::OpenAIReasoner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIReasoner::from_env().unwrap();
//!     let prompt = ReasonerPrompt { system: "", text: "Say hi", media: None };
//!     let schema = serde_json::json!({"type": "object"});
//!     let value = backend.generate("gemini-2.0-flash", &prompt, &schema).await.unwrap();
//!     println!("{value}");
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{parse_json_content, OpenAIConfig, OpenAIReasoner};
pub use error::{to_insight_error, OpenAIErrorCode};
pub use types::*;
