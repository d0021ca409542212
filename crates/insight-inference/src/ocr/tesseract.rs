//! Local OCR using the tesseract CLI.
//!
//! Images are OCR'd directly. PDFs are rendered to PNG with `pdftoppm` first,
//! then each page is OCR'd and the results concatenated in page order.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::{NamedTempFile, TempDir};
use tokio::process::Command;
use tracing::{debug, warn};

use insight_core::defaults;
use insight_core::{DocumentText, Error, OcrBackend, Result, TextDetection, TextRecognition};

const PAGE_SEPARATOR: &str = "\n\n";

/// Settings for the tesseract backend.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Language pack passed to `-l`.
    pub language: String,
    /// Rasterization DPI for PDF pages.
    pub dpi: u32,
    /// Pages rendered from a PDF.
    pub max_pages: u32,
    /// Per-command timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            language: defaults::OCR_LANGUAGE.to_string(),
            dpi: defaults::OCR_DPI,
            max_pages: defaults::PDF_OCR_MAX_PAGES,
            timeout_seconds: defaults::EXTRACTION_CMD_TIMEOUT_SECS,
        }
    }
}

pub struct TesseractOcr {
    config: TesseractConfig,
}

impl TesseractOcr {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    async fn ocr_image_file(&self, path: &Path) -> Result<String> {
        run_cmd_with_timeout(
            Command::new("tesseract")
                .arg(path)
                .arg("stdout")
                .arg("-l")
                .arg(&self.config.language),
            self.config.timeout_seconds,
        )
        .await
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

/// Run a command with a timeout, returning stdout as a string.
async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    let output = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| Error::Ocr(format!("External command timed out after {}s", timeout_secs)))?
        .map_err(|e| Error::Ocr(format!("Failed to execute command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Ocr(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn write_temp(data: &[u8]) -> Result<NamedTempFile> {
    let mut tmpfile = NamedTempFile::new()?;
    tmpfile.write_all(data)?;
    tmpfile.flush()?;
    Ok(tmpfile)
}

/// Rendered page images in page order.
async fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            pages.push(path);
        }
    }
    // pdftoppm zero-pads page numbers, so lexical order is page order.
    pages.sort();
    Ok(pages)
}

#[async_trait]
impl OcrBackend for TesseractOcr {
    async fn recognize_text(&self, image: &[u8]) -> Result<TextRecognition> {
        let tmpfile = write_temp(image)?;
        let text = self.ocr_image_file(tmpfile.path()).await?;

        debug!(
            subsystem = "ocr",
            component = "tesseract",
            text_len = text.len(),
            "Image OCR complete"
        );

        if text.trim().is_empty() {
            return Ok(TextRecognition::default());
        }
        Ok(TextRecognition {
            detections: vec![TextDetection {
                description: text.trim().to_string(),
            }],
        })
    }

    async fn recognize_document(&self, pdf: &[u8]) -> Result<DocumentText> {
        let tmpfile = write_temp(pdf)?;
        let img_dir = TempDir::new()?;
        let img_prefix = img_dir.path().join("page");

        debug!(
            subsystem = "ocr",
            component = "tesseract",
            dpi = self.config.dpi,
            max_pages = self.config.max_pages,
            "Rendering PDF pages for OCR"
        );

        run_cmd_with_timeout(
            Command::new("pdftoppm")
                .arg("-png")
                .arg("-r")
                .arg(self.config.dpi.to_string())
                .arg("-l")
                .arg(self.config.max_pages.to_string())
                .arg(tmpfile.path())
                .arg(&img_prefix),
            // Rendering several pages takes longer than one OCR pass.
            self.config.timeout_seconds * 3,
        )
        .await?;

        let pages = list_pngs(img_dir.path()).await?;
        if pages.is_empty() {
            return Ok(DocumentText { full_text: None });
        }

        let mut page_texts = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            match self.ocr_image_file(page).await {
                Ok(text) if !text.trim().is_empty() => page_texts.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => warn!(page = i + 1, error = %e, "OCR failed for page, skipping"),
            }
        }

        let full_text = page_texts.join(PAGE_SEPARATOR);
        Ok(DocumentText {
            full_text: (!full_text.is_empty()).then_some(full_text),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let pdftoppm_ok = match Command::new("pdftoppm").arg("-v").output().await {
            Ok(output) => output.status.success() || output.status.code() == Some(99),
            Err(_) => false,
        };
        let tesseract_ok = match Command::new("tesseract").arg("--version").output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        };
        Ok(pdftoppm_ok && tesseract_ok)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
