//! Structured logging field name constants for InsightFlow.
//!
//! All crates use these constants so log aggregation can query the same
//! field names across the pipeline, the backends, and the HTTP layer.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Every fallback exhausted, operator attention needed |
//! | WARN  | Recoverable failure, degraded content or fallback applied |
//! | INFO  | Lifecycle events, request completions |
//! | DEBUG | Strategy selection, precedence decisions, sizes |
//! | TRACE | Per-entry iteration (archive entries, sheets) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one analyze request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "extract", "ocr", "reasoner"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pdf_text", "google_vision", "openai", "selector"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "decode", "extract", "recognize_text", "generate"
pub const OPERATION: &str = "op";

// ─── Content fields ────────────────────────────────────────────────────────

/// Caller-declared MIME type.
pub const FILE_TYPE: &str = "file_type";

/// Extraction strategy selected by the dispatcher.
pub const STRATEGY: &str = "strategy";

/// Decoded payload size in bytes.
pub const PAYLOAD_BYTES: &str = "payload_bytes";

/// Length of extracted or generated text.
pub const TEXT_LEN: &str = "text_len";

/// Which content field the selector made primary.
pub const PRIMARY_CONTENT: &str = "primary_content";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model identifier used for a reasoner attempt.
pub const MODEL: &str = "model";

/// Zero-based reasoner attempt index.
pub const ATTEMPT: &str = "attempt";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
