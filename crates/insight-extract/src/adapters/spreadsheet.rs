//! SpreadsheetText extraction adapter: tab-delimited text from XLSX workbooks.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{Reader, Xlsx};
use tracing::{debug, trace, warn};

use insight_core::defaults::NO_TEXT_IN_XLSX;
use insight_core::{
    Error, ExtractionAdapter, ExtractionOutcome, ExtractionResult, ExtractionStrategy, Result,
};

/// Adapter for `.xlsx` workbooks using calamine.
///
/// Every sheet is visited in workbook order. Each sheet with content adds a
/// `Sheet "<name>":` block of tab-delimited rows. Parsing runs on the
/// blocking pool.
pub struct SpreadsheetAdapter;

/// Render every non-blank sheet of the workbook.
fn workbook_text(data: Vec<u8>) -> Result<String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| Error::Extraction(e.to_string()))?;

    let mut out = String::new();
    for name in workbook.sheet_names().to_vec() {
        // One unreadable sheet fails the whole workbook, discarding sheets
        // already rendered.
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| Error::Extraction(format!("sheet \"{}\": {}", name, e)))?;

        let rows: Vec<String> = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .filter(|line| !line.trim().is_empty())
            .collect();

        trace!(sheet = %name, rows = rows.len(), "Sheet read");

        let text = rows.join("\n");
        if text.trim().is_empty() {
            continue;
        }
        out.push_str(&format!("Sheet \"{}\":\n{}\n\n", name, text));
    }

    Ok(out.trim().to_string())
}

#[async_trait]
impl ExtractionAdapter for SpreadsheetAdapter {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::SpreadsheetText
    }

    async fn extract(&self, data: &[u8], _mime_type: &str) -> ExtractionResult {
        let bytes = data.to_vec();
        let parsed = tokio::task::spawn_blocking(move || workbook_text(bytes))
            .await
            .map_err(|e| Error::Internal(format!("Spreadsheet task failed: {}", e)))
            .and_then(|r| r);

        match parsed {
            Ok(text) if text.is_empty() => {
                debug!(
                    subsystem = "extract",
                    component = "spreadsheet",
                    "Workbook has no text content"
                );
                ExtractionResult::processed(NO_TEXT_IN_XLSX, ExtractionOutcome::Empty)
            }
            Ok(text) => {
                debug!(
                    subsystem = "extract",
                    component = "spreadsheet",
                    text_len = text.len(),
                    "Workbook extracted"
                );
                ExtractionResult::processed(text, ExtractionOutcome::Ok)
            }
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    component = "spreadsheet",
                    error = %e,
                    "XLSX parsing failed"
                );
                ExtractionResult::processed(
                    format!("XLSX parsing failed: {}", super::cause(&e)),
                    ExtractionOutcome::Failed,
                )
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }
}
