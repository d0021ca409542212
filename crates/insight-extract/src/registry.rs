//! Extraction adapter registry: the type dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use insight_core::{ExtractionAdapter, ExtractionResult, ExtractionStrategy, OcrBackend};

use crate::adapters::{
    ArchiveListingAdapter, ImageOcrAdapter, PassthroughAdapter, PdfTextAdapter, SpreadsheetAdapter,
};

/// Registry mapping extraction strategies to their adapter implementations.
///
/// A strategy without a registered adapter is served by the passthrough
/// adapter, so dispatch never fails.
pub struct ExtractionRegistry {
    adapters: HashMap<ExtractionStrategy, Arc<dyn ExtractionAdapter>>,
    fallback: Arc<dyn ExtractionAdapter>,
}

impl ExtractionRegistry {
    /// Create a registry with only the passthrough fallback.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: Arc::new(PassthroughAdapter),
        }
    }

    /// Registry with every built-in strategy, sharing one OCR backend.
    pub fn with_defaults(ocr: Arc<dyn OcrBackend>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ImageOcrAdapter::new(ocr.clone())));
        registry.register(Arc::new(SpreadsheetAdapter));
        registry.register(Arc::new(ArchiveListingAdapter));
        registry.register(Arc::new(PdfTextAdapter::new(ocr)));
        registry.register(Arc::new(PassthroughAdapter));
        registry
    }

    /// Register an adapter. Replaces any existing adapter for the same strategy.
    pub fn register(&mut self, adapter: Arc<dyn ExtractionAdapter>) {
        self.adapters.insert(adapter.strategy(), adapter);
    }

    /// The adapter that will serve `strategy`.
    pub fn adapter_for(&self, strategy: ExtractionStrategy) -> &Arc<dyn ExtractionAdapter> {
        self.adapters.get(&strategy).unwrap_or(&self.fallback)
    }

    /// Extract content using the adapter registered for the given strategy.
    pub async fn extract(
        &self,
        strategy: ExtractionStrategy,
        data: &[u8],
        mime_type: &str,
    ) -> ExtractionResult {
        if !self.has_adapter(strategy) {
            debug!(
                subsystem = "extract",
                strategy = %strategy,
                "No adapter registered, using passthrough"
            );
        }
        self.adapter_for(strategy).extract(data, mime_type).await
    }

    /// List all strategies that have registered adapters.
    pub fn available_strategies(&self) -> Vec<ExtractionStrategy> {
        self.adapters.keys().copied().collect()
    }

    /// Check if an adapter is registered for the given strategy.
    pub fn has_adapter(&self, strategy: ExtractionStrategy) -> bool {
        self.adapters.contains_key(&strategy)
    }

    /// Run health checks on all registered adapters.
    pub async fn health_check_all(&self) -> HashMap<ExtractionStrategy, bool> {
        let mut results = HashMap::new();
        for (strategy, adapter) in &self.adapters {
            let healthy = adapter.health_check().await.unwrap_or(false);
            results.insert(*strategy, healthy);
        }
        results
    }
}

impl Default for ExtractionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
