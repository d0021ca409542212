//! # insight-extract
//!
//! File-content normalization pipeline for InsightFlow.
//!
//! This crate provides:
//! - Extraction adapters for images (OCR), XLSX workbooks, ZIP archives, PDFs
//!   (direct text with OCR fallback), and passthrough of raw bytes
//! - The strategy registry that dispatches on the declared file type
//! - The content selector that enforces OCR text > processed text > media
//! - [`ContentPipeline`] and the end-to-end [`Analyzer`]
//! - DOCX embedded-image extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use insight_core::AnalyzeRequest;
//! use insight_extract::{Analyzer, ContentPipeline};
//! use insight_inference::InferenceConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = InferenceConfig::load().unwrap();
//!     let analyzer = Analyzer::new(
//!         ContentPipeline::with_ocr(config.build_ocr_backend().unwrap()),
//!         config.build_reasoner().unwrap(),
//!     );
//!     let answer = analyzer
//!         .analyze(&AnalyzeRequest {
//!             file_data_uri: None,
//!             question: "What is the capital of France?".to_string(),
//!             file_type: String::new(),
//!         })
//!         .await;
//!     println!("{}", answer.answer);
//! }
//! ```

pub mod adapters;
pub mod analyzer;
pub mod docx_media;
pub mod pipeline;
pub mod registry;
pub mod selector;

pub use adapters::{
    ArchiveListingAdapter, ImageOcrAdapter, PassthroughAdapter, PdfExtractSource, PdfTextAdapter,
    PdfTextSource, SpreadsheetAdapter,
};
pub use analyzer::Analyzer;
pub use docx_media::{extract_docx_images, extract_docx_images_within, EmbeddedImage};
pub use pipeline::ContentPipeline;
pub use registry::ExtractionRegistry;
pub use selector::{select_content, FileStage};
