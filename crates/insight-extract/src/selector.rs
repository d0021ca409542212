//! Content selector: decides which single representation reaches the
//! reasoner.
//!
//! Precedence is OCR text, then processed text, then raw media. Any text,
//! even a "no text found" or failure sentinel, clears the media reference.

use tracing::debug;

use insight_core::{
    ExtractionKind, ExtractionResult, ExtractionStrategy, MediaReference, NormalizedContentBundle,
    PrimaryContent,
};

/// What happened to the uploaded file before selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStage {
    /// No file was supplied.
    NoFile,
    /// The file was rejected before any strategy ran (bad data URI, too
    /// large). Holds the sentinel shown to the reasoner.
    Rejected(String),
    /// A strategy ran over the decoded bytes.
    Extracted {
        result: ExtractionResult,
        /// The decoded upload, kept when no text was produced.
        media: MediaReference,
    },
}

/// Build the bundle for one question.
///
/// Pure: the same stage, question, and file type always give the same bundle.
pub fn select_content(
    stage: FileStage,
    question: &str,
    file_type: &str,
) -> NormalizedContentBundle {
    let (file_supplied, primary) = match stage {
        FileStage::NoFile => (false, PrimaryContent::None),
        FileStage::Rejected(reason) => (true, rejected(reason, file_type)),
        FileStage::Extracted { result, media } => (true, extracted(result, media, file_type)),
    };

    debug!(
        subsystem = "extract",
        component = "selector",
        file_type,
        primary_content = primary.label(),
        "Content selected"
    );

    NormalizedContentBundle::new(question, file_type, file_supplied, primary)
}

/// Sentinel goes to the text slot of the declared type's strategy. Passthrough
/// types have no text slot and the unusable media is dropped.
fn rejected(reason: String, file_type: &str) -> PrimaryContent {
    match ExtractionStrategy::from_mime_type(file_type).text_kind() {
        Some(ExtractionKind::OcrText) => PrimaryContent::OcrText(reason),
        Some(_) => PrimaryContent::ProcessedText(reason),
        None => PrimaryContent::None,
    }
}

fn extracted(result: ExtractionResult, media: MediaReference, file_type: &str) -> PrimaryContent {
    match result.into_parts() {
        (ExtractionKind::OcrText, Some(text), _) => PrimaryContent::OcrText(text),
        (ExtractionKind::ProcessedText, Some(text), _) => PrimaryContent::ProcessedText(text),
        (ExtractionKind::ValidationError, Some(reason), _) => rejected(reason, file_type),
        (_, _, Some(reference)) => PrimaryContent::RawDocument(reference),
        (_, _, None) => PrimaryContent::RawDocument(media),
    }
}
