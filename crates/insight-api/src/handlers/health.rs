//! Health check.

use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let reasoner = state.analyzer.reasoner();
    let registry = state.analyzer.pipeline().registry();
    let ocr_healthy = state.ocr.health_check().await.unwrap_or(false);

    let extractors: BTreeMap<String, bool> = registry
        .health_check_all()
        .await
        .into_iter()
        .map(|(strategy, healthy)| (strategy.to_string(), healthy))
        .collect();

    let mut strategies: Vec<String> = registry
        .available_strategies()
        .iter()
        .map(ToString::to_string)
        .collect();
    strategies.sort();

    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "ocr_backend": state.ocr.name(),
        "ocr_healthy": ocr_healthy,
        "reasoner_backend": reasoner.backend_name(),
        "reasoner_models": reasoner.models(),
        "strategies": strategies,
        "extractors": extractors,
    }))
}
