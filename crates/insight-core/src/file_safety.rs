//! Ingress checks for uploaded bytes.
//!
//! The analyze pipeline trusts the declared file type. The OCR endpoint is
//! stricter: it accepts only PNG or JPEG payloads above a minimum size.

use crate::defaults;

/// Magic byte signatures accepted by the OCR endpoint
pub const IMAGE_SIGNATURES: &[(&str, &[u8])] = &[
    (
        defaults::MIME_PNG,
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    ),
    (defaults::MIME_JPEG, &[0xFF, 0xD8, 0xFF]),
];

/// Result of ingress validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub allowed: bool,
    pub block_reason: Option<String>,
    pub detected_type: Option<String>,
}

impl ValidationResult {
    pub fn allowed(detected: impl Into<String>) -> Self {
        Self {
            allowed: true,
            block_reason: None,
            detected_type: Some(detected.into()),
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            block_reason: Some(reason.into()),
            detected_type: None,
        }
    }
}

/// Validate an image bound for OCR: at least `OCR_MIN_IMAGE_BYTES` long and
/// starting with a PNG or JPEG signature.
pub fn validate_ocr_image(data: &[u8]) -> ValidationResult {
    if data.len() < defaults::OCR_MIN_IMAGE_BYTES {
        return ValidationResult::blocked(format!(
            "Image is {} bytes, minimum is {}",
            data.len(),
            defaults::OCR_MIN_IMAGE_BYTES
        ));
    }

    for (mime, magic) in IMAGE_SIGNATURES {
        if data.starts_with(magic) {
            return ValidationResult::allowed(*mime);
        }
    }

    ValidationResult::blocked(match detect_content_type(data) {
        Some(mime) => format!("Unsupported image type {}", mime),
        None => "Unrecognized image signature".to_string(),
    })
}

/// Detect a MIME type from magic bytes.
pub fn detect_content_type(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Guess an image MIME type from a file name. PNG when unknown.
pub fn image_mime_from_extension(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => defaults::MIME_JPEG,
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => defaults::MIME_PNG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.resize(128, 0);
        data
    }

    #[test]
    fn test_accepts_png() {
        let result = validate_ocr_image(&padded(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]));
        assert!(result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_accepts_jpeg() {
        let result = validate_ocr_image(&padded(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_rejects_short_image() {
        let result = validate_ocr_image(&[0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(!result.allowed);
        assert!(result.block_reason.unwrap().contains("minimum is 100"));
    }

    #[test]
    fn test_rejects_pdf_bytes() {
        let result = validate_ocr_image(&padded(b"%PDF-1.7"));
        assert!(!result.allowed);
        assert_eq!(
            result.block_reason.as_deref(),
            Some("Unsupported image type application/pdf")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let result = validate_ocr_image(&padded(b"not an image"));
        assert!(!result.allowed);
        assert_eq!(
            result.block_reason.as_deref(),
            Some("Unrecognized image signature")
        );
    }

    #[test]
    fn test_detect_png_magic_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(detect_content_type(&png), Some("image/png"));
    }

    #[test]
    fn test_image_mime_from_extension() {
        assert_eq!(image_mime_from_extension("word/media/image1.jpeg"), "image/jpeg");
        assert_eq!(image_mime_from_extension("word/media/image2.JPG"), "image/jpeg");
        assert_eq!(image_mime_from_extension("word/media/image3.gif"), "image/gif");
        assert_eq!(image_mime_from_extension("word/media/image4.bmp"), "image/bmp");
        assert_eq!(image_mime_from_extension("word/media/image5.emf"), "image/png");
        assert_eq!(image_mime_from_extension("word/media/noext"), "image/png");
    }
}
