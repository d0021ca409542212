//! Centralized default constants for InsightFlow.
//!
//! **This module is the single source of truth** for shared default values
//! and for the sentinel strings the pipeline forwards to the reasoner. Crates
//! should reference these constants instead of defining their own.

// =============================================================================
// MIME TYPES
// =============================================================================

pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_ZIP: &str = "application/zip";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_JSON: &str = "application/json";

// =============================================================================
// SIZE LIMITS
// =============================================================================

/// Maximum base64 payload length accepted at the HTTP boundary (2.5 MiB).
pub const MAX_BASE64_PAYLOAD_BYTES: usize = 2_621_440;

/// Maximum decoded byte size handed to any extraction strategy.
///
/// Base64 inflates by 4/3, so this comfortably covers the boundary limit.
pub const MAX_DECODED_BYTES: usize = 2 * 1024 * 1024;

/// Request body cap for the HTTP server. Larger than the payload limit so the
/// analyze handler can answer 413 with its own message.
pub const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Total decompressed bytes read from a DOCX's embedded media.
pub const MAX_DOCX_MEDIA_BYTES: usize = 16 * 1024 * 1024;

/// Minimum decoded size for an image accepted by the OCR endpoint.
pub const OCR_MIN_IMAGE_BYTES: usize = 100;

// =============================================================================
// EXTRACTION
// =============================================================================

/// Trimmed character count at which direct PDF text is accepted without OCR.
pub const PDF_DIRECT_TEXT_MIN_CHARS: usize = 100;

/// Per-command timeout for external OCR tools (seconds).
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 60;

/// Pages sent to the document OCR service for a PDF.
pub const PDF_OCR_MAX_PAGES: u32 = 5;

/// Default tesseract language pack.
pub const OCR_LANGUAGE: &str = "eng";

/// Default rasterization DPI for PDF OCR.
pub const OCR_DPI: u32 = 300;

// =============================================================================
// SENTINELS
// =============================================================================

pub const NO_TEXT_IN_IMAGE: &str = "No text found in image by OCR.";
pub const NO_TEXT_IN_XLSX: &str = "No text content found in XLSX file.";
pub const EMPTY_ZIP: &str = "ZIP file is empty or contains no listable files.";
pub const ZIP_LISTING_HEADER: &str = "Contents of ZIP file:";
pub const NO_TEXT_IN_PDF: &str =
    "No text found in PDF by OCR (after attempting direct parse and OCR).";

/// Source attributed to answers drawn from an uploaded file.
pub const UPLOADED_DOCUMENT_SOURCE: &str = "Uploaded Document";

/// Terminal answer when every reasoner attempt has failed.
pub const APOLOGY_ANSWER: &str = "Sorry, the analysis failed. Please try again later.";

// =============================================================================
// REASONER
// =============================================================================

/// Default OpenAI-compatible endpoint (Gemini's compatibility layer).
pub const REASONER_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Model for the first reasoner attempt.
pub const REASONER_FAST_MODEL: &str = "gemini-2.0-flash";

/// Model for the fallback reasoner attempt.
pub const REASONER_FALLBACK_MODEL: &str = "gemini-1.5-pro";

/// Reasoner request timeout in seconds.
pub const REASONER_TIMEOUT_SECS: u64 = 240;

// =============================================================================
// OCR SERVICE
// =============================================================================

/// Google Cloud Vision REST endpoint.
pub const GOOGLE_VISION_URL: &str = "https://vision.googleapis.com/v1";

/// OCR request timeout in seconds.
pub const OCR_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 9002;

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// CORS max-age for preflight caching.
pub const CORS_MAX_AGE_SECS: u64 = 3600;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_CONFIG_PATH: &str = "INSIGHT_CONFIG";
pub const ENV_REASONER_BASE_URL: &str = "REASONER_BASE_URL";
pub const ENV_REASONER_API_KEY: &str = "REASONER_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_REASONER_FAST_MODEL: &str = "REASONER_FAST_MODEL";
pub const ENV_REASONER_FALLBACK_MODEL: &str = "REASONER_FALLBACK_MODEL";
pub const ENV_REASONER_TIMEOUT_SECS: &str = "REASONER_TIMEOUT_SECS";
pub const ENV_OCR_BACKEND: &str = "OCR_BACKEND";
pub const ENV_GOOGLE_VISION_API_KEY: &str = "GOOGLE_VISION_API_KEY";
pub const ENV_GOOGLE_VISION_URL: &str = "GOOGLE_VISION_URL";
pub const ENV_TESSERACT_LANGUAGE: &str = "TESSERACT_LANGUAGE";
pub const ENV_OCR_DPI: &str = "OCR_DPI";
