//! Extraction adapter implementations.

pub mod archive;
pub mod image_ocr;
pub mod passthrough;
pub mod pdf_text;
pub mod spreadsheet;

pub use archive::ArchiveListingAdapter;
pub use image_ocr::ImageOcrAdapter;
pub use passthrough::PassthroughAdapter;
pub use pdf_text::{PdfExtractSource, PdfTextAdapter, PdfTextSource};
pub use spreadsheet::SpreadsheetAdapter;

/// Message of an error without the variant prefix, for sentinel text.
pub(crate) fn cause(err: &insight_core::Error) -> String {
    use insight_core::Error;
    match err {
        Error::Ocr(msg) | Error::Extraction(msg) | Error::Inference(msg) => msg.clone(),
        other => other.to_string(),
    }
}
