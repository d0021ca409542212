//! Passthrough adapter: forwards the raw bytes for the reasoner to read.

use async_trait::async_trait;

use insight_core::{
    ExtractionAdapter, ExtractionResult, ExtractionStrategy, MediaReference, Result,
};

/// Adapter for text, JSON, DOCX, and any type without its own strategy.
///
/// Also the registry's fallback when a strategy has no adapter.
pub struct PassthroughAdapter;

#[async_trait]
impl ExtractionAdapter for PassthroughAdapter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Passthrough
    }

    async fn extract(&self, data: &[u8], mime_type: &str) -> ExtractionResult {
        ExtractionResult::media(MediaReference::new(mime_type, data.to_vec()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}
