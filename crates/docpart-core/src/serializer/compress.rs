//! Compact transport codec: base64(gzip(JSON))

use crate::element::Element;
use crate::error::Result;
use base64::{engine::general_purpose, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Gzips `text` and encodes the result as standard base64.
///
/// # Errors
///
/// Returns [`DocpartError::IoError`](crate::DocpartError::IoError) if the gzip
/// stream fails.
pub fn compress_str(text: &str) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(general_purpose::STANDARD.encode(compressed))
}

/// Reverses [`compress_str`].
///
/// # Errors
///
/// Returns [`DocpartError::Base64Error`](crate::DocpartError::Base64Error) for
/// invalid base64 and [`DocpartError::IoError`](crate::DocpartError::IoError)
/// for a corrupt gzip stream or non UTF-8 content.
pub fn decompress_str(payload: &str) -> Result<String> {
    let compressed = general_purpose::STANDARD.decode(payload.trim())?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

/// Elements as base64(gzip(compact JSON array)).
///
/// # Errors
///
/// Returns an error if JSON encoding or compression fails.
pub fn elements_to_base64_gzipped_json(elements: &[Element]) -> Result<String> {
    compress_str(&serde_json::to_string(elements)?)
}

/// Decodes the output of [`elements_to_base64_gzipped_json`].
///
/// # Errors
///
/// Returns an error for invalid base64, a corrupt gzip stream, or a payload
/// that is not a JSON array of element records.
pub fn elements_from_base64_gzipped_json(payload: &str) -> Result<Vec<Element>> {
    super::json::elements_from_json(&decompress_str(payload)?)
}
