//! ArchiveListing extraction adapter: lists the entries of a ZIP archive.

use std::io::Cursor;

use async_trait::async_trait;
use tracing::{debug, warn};
use zip::ZipArchive;

use insight_core::defaults::{EMPTY_ZIP, ZIP_LISTING_HEADER};
use insight_core::{
    Error, ExtractionAdapter, ExtractionOutcome, ExtractionResult, ExtractionStrategy, Result,
};

/// Adapter that lists archive entries without extracting them.
pub struct ArchiveListingAdapter;

/// `- <name> (file|directory)` per entry, in central-directory order.
fn list_entries(data: Vec<u8>) -> Result<Vec<String>> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| Error::Extraction(e.to_string()))?;

    let mut lines = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        // Raw access: no decompression, and encrypted entries still list.
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| Error::Extraction(e.to_string()))?;
        let name = entry.name();
        if name.trim().is_empty() {
            continue;
        }
        let kind = if entry.is_dir() { "directory" } else { "file" };
        lines.push(format!("- {} ({})", name, kind));
    }

    Ok(lines)
}

#[async_trait]
impl ExtractionAdapter for ArchiveListingAdapter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::ArchiveListing
    }

    async fn extract(&self, data: &[u8], _mime_type: &str) -> ExtractionResult {
        let bytes = data.to_vec();
        let listed = tokio::task::spawn_blocking(move || list_entries(bytes))
            .await
            .map_err(|e| Error::Internal(format!("Archive task failed: {}", e)))
            .and_then(|r| r);

        match listed {
            Ok(lines) if lines.is_empty() => {
                debug!(subsystem = "extract", component = "archive", "Archive has no entries");
                ExtractionResult::processed(EMPTY_ZIP, ExtractionOutcome::Empty)
            }
            Ok(lines) => {
                debug!(
                    subsystem = "extract",
                    component = "archive",
                    entries = lines.len(),
                    "Archive listed"
                );
                ExtractionResult::processed(
                    format!("{}\n{}", ZIP_LISTING_HEADER, lines.join("\n")),
                    ExtractionOutcome::Ok,
                )
            }
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    component = "archive",
                    error = %e,
                    "ZIP parsing failed"
                );
                ExtractionResult::processed(
                    format!("ZIP parsing failed: {}", super::cause(&e)),
                    ExtractionOutcome::Failed,
                )
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "archive"
    }
}
