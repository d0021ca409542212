//! # insight-core
//!
//! Core types, traits, and abstractions for InsightFlow.
//!
//! This crate provides the data model of the file-content normalization
//! pipeline and the trait definitions that the OCR, reasoner, and extraction
//! crates implement.

pub mod data_uri;
pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use data_uri::{decode_lenient, DataUri, DataUriError};
pub use error::{Error, Result};
pub use file_safety::{
    detect_content_type, image_mime_from_extension, validate_ocr_image, ValidationResult,
};
pub use models::*;
pub use traits::*;
