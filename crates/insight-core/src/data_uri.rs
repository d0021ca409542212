//! Data-URI decoding for uploaded files.
//!
//! Uploads arrive as `data:<mime>;base64,<payload>`. The decoder checks the
//! envelope and decodes the payload; it does not validate byte length or
//! magic numbers; strategies and the OCR endpoint do that themselves.
//!
//! Payload decoding is lenient the same way browser and Node decoders are:
//! strict standard base64 is tried first, and if that fails, characters outside
//! the alphabet are dropped and the rest decoded without padding rules.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Reasons a data URI cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    /// Input does not start with `data:`.
    #[error("Expected a data: URI")]
    MissingScheme,

    /// Header is not marked `;base64`.
    #[error("Only base64-encoded data URIs are supported")]
    NotBase64,

    /// No comma, or nothing after it.
    #[error("Base64 content is missing")]
    MissingPayload,
}

/// A decoded upload: payload bytes plus the MIME type carried in the URI.
///
/// The embedded MIME type is informational; dispatch uses the caller-declared
/// file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: Vec<u8>,
}

impl DataUri {
    /// Parse and decode a `data:<mime>;base64,<payload>` string.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input
            .trim_start()
            .strip_prefix(SCHEME)
            .ok_or(DataUriError::MissingScheme)?;

        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(DataUriError::NotBase64)?;

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(DataUriError::MissingPayload);
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: decode_lenient(payload),
        })
    }

    /// Length of the payload segment (after the first comma) without decoding.
    ///
    /// Strings without a comma are treated as bare base64 and measured whole.
    pub fn base64_payload_len(input: &str) -> usize {
        match input.split_once(',') {
            Some((_, payload)) => payload.len(),
            None => input.len(),
        }
    }

    /// Build a data URI string from a MIME type and raw bytes.
    pub fn encode(mime_type: &str, data: &[u8]) -> String {
        format!("{SCHEME}{mime_type}{BASE64_MARKER},{}", STANDARD.encode(data))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the URI, returning `(mime_type, bytes)`.
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.mime_type, self.data)
    }
}

/// Decode base64 the way a permissive runtime would.
///
/// Never fails: garbage input yields whatever bytes the valid characters
/// encode, possibly none.
pub fn decode_lenient(payload: &str) -> Vec<u8> {
    if let Ok(bytes) = STANDARD.decode(payload) {
        return bytes;
    }

    let mut cleaned: String = payload
        .chars()
        .filter_map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => Some(c),
            '-' => Some('+'),
            '_' => Some('/'),
            _ => None,
        })
        .collect();

    // A single trailing sextet cannot encode a byte.
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    LENIENT.decode(cleaned.as_bytes()).unwrap_or_default()
}
