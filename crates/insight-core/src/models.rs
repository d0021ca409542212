//! Data models for the content normalization pipeline.

use serde::{Deserialize, Serialize};

use crate::data_uri::DataUri;
use crate::defaults;

// =============================================================================
// EXTRACTION STRATEGY
// =============================================================================

/// Extraction strategy for an uploaded file.
///
/// Selected from the caller-declared file type, never from the payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// OCR over a PNG or JPEG image
    ImageOcr,
    /// Tab-delimited text from every sheet of an XLSX workbook
    SpreadsheetText,
    /// Listing of the entries in a ZIP archive
    ArchiveListing,
    /// Direct PDF text, with document OCR as fallback
    PdfText,
    /// Raw bytes forwarded to the reasoner as a media reference
    #[default]
    Passthrough,
}

impl ExtractionStrategy {
    /// Determine extraction strategy from the declared MIME type.
    ///
    /// Exact, case-sensitive match. Anything unrecognized is passed through.
    pub fn from_mime_type(mime: &str) -> Self {
        match mime {
            defaults::MIME_PNG | defaults::MIME_JPEG => Self::ImageOcr,
            defaults::MIME_XLSX => Self::SpreadsheetText,
            defaults::MIME_ZIP => Self::ArchiveListing,
            defaults::MIME_PDF => Self::PdfText,
            _ => Self::Passthrough,
        }
    }

    /// Which text slot this strategy fills, or `None` for passthrough.
    pub fn text_kind(&self) -> Option<ExtractionKind> {
        match self {
            Self::ImageOcr => Some(ExtractionKind::OcrText),
            Self::SpreadsheetText | Self::ArchiveListing | Self::PdfText => {
                Some(ExtractionKind::ProcessedText)
            }
            Self::Passthrough => None,
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageOcr => write!(f, "image_ocr"),
            Self::SpreadsheetText => write!(f, "spreadsheet_text"),
            Self::ArchiveListing => write!(f, "archive_listing"),
            Self::PdfText => write!(f, "pdf_text"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

// =============================================================================
// EXTRACTION RESULT
// =============================================================================

/// What an extraction produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKind {
    OcrText,
    ProcessedText,
    RawMediaReference,
    ValidationError,
}

/// Whether the produced text is real content or a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Real content was extracted.
    Ok,
    /// Extraction worked but found nothing; text is a "no content" sentinel.
    Empty,
    /// Extraction failed; text is a "... failed: <cause>" sentinel.
    Failed,
}

/// Raw file bytes forwarded to the reasoner unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaReference {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Render as a `data:<mime>;base64,...` URI.
    pub fn to_data_uri(&self) -> String {
        DataUri::encode(&self.mime_type, &self.data)
    }
}

/// Output of one extraction strategy.
///
/// Carries either text or a media reference, never both. Fields are private
/// so the only way to build one is through the constructors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    kind: ExtractionKind,
    outcome: ExtractionOutcome,
    text: Option<String>,
    media_reference: Option<MediaReference>,
    diagnostic: Option<String>,
}

impl ExtractionResult {
    /// OCR text (real content or a sentinel, per `outcome`).
    pub fn ocr(text: impl Into<String>, outcome: ExtractionOutcome) -> Self {
        Self::text_result(ExtractionKind::OcrText, text.into(), outcome)
    }

    /// Text produced by a document parser.
    pub fn processed(text: impl Into<String>, outcome: ExtractionOutcome) -> Self {
        Self::text_result(ExtractionKind::ProcessedText, text.into(), outcome)
    }

    /// File bytes to forward unchanged.
    pub fn media(reference: MediaReference) -> Self {
        Self {
            kind: ExtractionKind::RawMediaReference,
            outcome: ExtractionOutcome::Ok,
            text: None,
            media_reference: Some(reference),
            diagnostic: None,
        }
    }

    /// Input was rejected before any strategy ran.
    pub fn validation_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ExtractionKind::ValidationError,
            outcome: ExtractionOutcome::Failed,
            text: Some(message.clone()),
            media_reference: None,
            diagnostic: Some(message),
        }
    }

    fn text_result(kind: ExtractionKind, text: String, outcome: ExtractionOutcome) -> Self {
        let diagnostic = match outcome {
            ExtractionOutcome::Ok => None,
            _ => Some(text.clone()),
        };
        Self {
            kind,
            outcome,
            text: Some(text),
            media_reference: None,
            diagnostic,
        }
    }

    /// Replace the diagnostic, e.g. with the underlying cause of a failure.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    pub fn kind(&self) -> ExtractionKind {
        self.kind
    }

    pub fn outcome(&self) -> ExtractionOutcome {
        self.outcome
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn media_reference(&self) -> Option<&MediaReference> {
        self.media_reference.as_ref()
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == ExtractionOutcome::Ok
    }

    /// Consume the result, returning `(kind, text, media_reference)`.
    pub fn into_parts(self) -> (ExtractionKind, Option<String>, Option<MediaReference>) {
        (self.kind, self.text, self.media_reference)
    }
}

// =============================================================================
// NORMALIZED CONTENT
// =============================================================================

/// The single representation forwarded to the reasoner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrimaryContent {
    #[default]
    None,
    OcrText(String),
    ProcessedText(String),
    RawDocument(MediaReference),
}

impl PrimaryContent {
    /// Label shown to the reasoner describing which field is primary.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OcrText(_) => "ocr_text",
            Self::ProcessedText(_) => "processed_text",
            Self::RawDocument(_) => "raw_document",
        }
    }
}

/// Everything the reasoner receives for one question.
///
/// At most one of `ocr_text`, `processed_text`, `media_reference` is set;
/// `PrimaryContent` makes any other combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContentBundle {
    question: String,
    declared_file_type: String,
    file_supplied: bool,
    primary: PrimaryContent,
}

impl NormalizedContentBundle {
    pub fn new(
        question: impl Into<String>,
        declared_file_type: impl Into<String>,
        file_supplied: bool,
        primary: PrimaryContent,
    ) -> Self {
        Self {
            question: question.into(),
            declared_file_type: declared_file_type.into(),
            file_supplied,
            primary,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn declared_file_type(&self) -> &str {
        &self.declared_file_type
    }

    /// Whether the caller attached a file, even one that was rejected.
    pub fn file_supplied(&self) -> bool {
        self.file_supplied
    }

    pub fn primary(&self) -> &PrimaryContent {
        &self.primary
    }

    pub fn ocr_text(&self) -> Option<&str> {
        match &self.primary {
            PrimaryContent::OcrText(text) => Some(text),
            _ => None,
        }
    }

    pub fn processed_text(&self) -> Option<&str> {
        match &self.primary {
            PrimaryContent::ProcessedText(text) => Some(text),
            _ => None,
        }
    }

    pub fn media_reference(&self) -> Option<&MediaReference> {
        match &self.primary {
            PrimaryContent::RawDocument(media) => Some(media),
            _ => None,
        }
    }
}

// =============================================================================
// REQUEST / ANSWER
// =============================================================================

/// A question about an optional uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub file_data_uri: Option<String>,
    pub question: String,
    /// Caller-declared MIME type; drives strategy selection.
    #[serde(default)]
    pub file_type: String,
}

/// Answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<String>,
    pub requires_image_generation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_generation_prompt: Option<String>,
    /// Filled in by callers that render images; never set by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_uri: Option<String>,
}

impl AnswerResult {
    /// Terminal answer when every reasoner attempt failed.
    pub fn apology() -> Self {
        Self {
            answer: defaults::APOLOGY_ANSWER.to_string(),
            sources: Vec::new(),
            requires_image_generation: false,
            image_generation_prompt: None,
            generated_image_uri: None,
        }
    }
}
