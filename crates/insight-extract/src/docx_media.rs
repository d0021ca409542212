//! Embedded image extraction from DOCX files.
//!
//! A DOCX is a ZIP archive; embedded images live under `word/media/`. Each is
//! returned as a data URI whose MIME type is guessed from the file extension.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use insight_core::defaults::MAX_DOCX_MEDIA_BYTES;
use insight_core::{image_mime_from_extension, DataUri, Error, Result};

const MEDIA_PREFIX: &str = "word/media/";

/// An image embedded in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Path inside the archive, e.g. `word/media/image1.png`.
    pub path: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    pub fn to_data_uri(&self) -> String {
        DataUri::encode(self.mime_type, &self.data)
    }
}

/// Every file under `word/media/`, in archive order.
pub fn extract_docx_images(docx: &[u8]) -> Result<Vec<EmbeddedImage>> {
    extract_docx_images_within(docx, MAX_DOCX_MEDIA_BYTES)
}

/// Like [`extract_docx_images`], failing once the decompressed media exceeds
/// `budget` bytes in total. Header sizes are not trusted.
pub fn extract_docx_images_within(docx: &[u8], budget: usize) -> Result<Vec<EmbeddedImage>> {
    let mut archive = ZipArchive::new(Cursor::new(docx))
        .map_err(|e| Error::Extraction(format!("Not a DOCX archive: {}", e)))?;

    let mut images = Vec::new();
    let mut remaining = budget;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Extraction(e.to_string()))?;

        if entry.is_dir() || !entry.name().starts_with(MEDIA_PREFIX) {
            continue;
        }

        let path = entry.name().to_string();
        let mut data = Vec::new();
        (&mut entry)
            .take(remaining as u64 + 1)
            .read_to_end(&mut data)
            .map_err(|e| Error::Extraction(format!("Failed to read {}: {}", path, e)))?;

        if data.len() > remaining {
            return Err(Error::Extraction(format!(
                "Embedded media exceeds the {} byte limit at {}",
                budget, path
            )));
        }
        remaining -= data.len();

        images.push(EmbeddedImage {
            mime_type: image_mime_from_extension(&path),
            path,
            data,
        });
    }

    debug!(
        subsystem = "extract",
        component = "docx_media",
        images = images.len(),
        "DOCX media extracted"
    );

    Ok(images)
}
