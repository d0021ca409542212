//! # insight-api
//!
//! HTTP boundary for InsightFlow: request validation, payload-size limits,
//! and routing to the normalization pipeline and reasoner.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use insight_core::defaults::MAX_REQUEST_BODY_BYTES;
use insight_core::OcrBackend;
use insight_extract::Analyzer;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    /// Backend for the direct OCR endpoint; the analyzer's pipeline holds its
    /// own handle to the same backend.
    pub ocr: Arc<dyn OcrBackend>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, ocr: Arc<dyn OcrBackend>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            ocr,
        }
    }
}

/// Routes with body limits. Tracing, request-id, and CORS layers are added
/// by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/ocr", post(handlers::ocr::ocr))
        .route("/api/extract-images", post(handlers::media::extract_images))
        // Payload limits are enforced per handler with JSON errors; the
        // transport cap only guards memory.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
