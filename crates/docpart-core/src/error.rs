//! Error types for element construction, classification and serialization.
//!
//! This module defines the error types that can occur while building elements,
//! applying text transforms, and encoding or decoding element sequences.

use thiserror::Error;

/// Error types that can occur while producing or exchanging elements.
///
/// Lenient situations are deliberately *not* represented here: an unknown
/// layout label falls back to the generic `Text` element and unknown fields in
/// a serialized record are dropped. Everything below is surfaced to the caller
/// immediately and is never retried internally.
///
/// # Examples
///
/// ## Pattern Matching on Errors
///
/// ```
/// use docpart_core::{CoordinateSystem, DocpartError, ElementMetadata};
///
/// let result = ElementMetadata::default().with_coordinates(
///     Some(vec![(0.0, 0.0), (1.0, 1.0)]),
///     None::<CoordinateSystem>,
/// );
///
/// match result {
///     Err(DocpartError::CoordinateMismatch(msg)) => assert!(msg.contains("coordinate system")),
///     _ => panic!("expected a coordinate mismatch"),
/// }
/// ```
///
/// ## Error Propagation with ?
///
/// ```
/// use docpart_core::{elements_from_json, elements_to_json, Element, Result};
///
/// fn reencode(json: &str) -> Result<String> {
///     let elements = elements_from_json(json)?;
///     elements_to_json(&elements)
/// }
///
/// let json = elements_to_json(&[Element::title("Summary")])?;
/// assert_eq!(reencode(&json)?, json);
/// # Ok::<(), docpart_core::DocpartError>(())
/// ```
#[derive(Error, Debug)]
pub enum DocpartError {
    /// Coordinates were supplied without a coordinate system, or vice versa.
    ///
    /// `points` and `system` must be both present or both absent.
    #[error("Coordinate mismatch: {0}")]
    CoordinateMismatch(String),

    /// A text transform passed to `Element::apply` did not produce a string.
    ///
    /// The element text is left exactly as it was before the failing transform.
    #[error("Invalid transform output: {0}")]
    InvalidTransformOutput(String),

    /// Malformed structural input.
    ///
    /// Raised for payloads that are not a sequence of element records, invalid
    /// UTF-8 input, or an unrecognized coordinate orientation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An element reached an HTML post-filter without its tag context.
    ///
    /// Every element emitted by the HTML partitioner carries a `TagContext`;
    /// losing it indicates the page was assembled outside the partitioner.
    #[error("Missing tag context: {0}")]
    MissingTagContext(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error from the gzip stream of the compact transport encoding.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The compact transport payload is not valid base64.
    #[error("Base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Backend-specific error.
    ///
    /// This occurs when a partitioning backend cannot set up its own
    /// machinery (for example a CSS selector that fails to compile).
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Type alias for [`Result<T, DocpartError>`].
pub type Result<T> = std::result::Result<T, DocpartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_mismatch_display() {
        let error = DocpartError::CoordinateMismatch("points without system".to_string());
        assert_eq!(
            format!("{error}"),
            "Coordinate mismatch: points without system"
        );
    }

    #[test]
    fn test_invalid_transform_output_display() {
        let error = DocpartError::InvalidTransformOutput("transform 2".to_string());
        let display = format!("{error}");
        assert!(display.starts_with("Invalid transform output"));
        assert!(display.contains("transform 2"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: DocpartError = json_err.into();

        match err {
            DocpartError::JsonError(e) => assert!(!e.to_string().is_empty()),
            _ => panic!("Expected JsonError variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated gzip");
        let err: DocpartError = io_err.into();

        match err {
            DocpartError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(DocpartError::InvalidInput("not an array".to_string()))
        }

        fn outer() -> Result<String> {
            inner()?;
            Ok("unreachable".to_string())
        }

        match outer() {
            Err(DocpartError::InvalidInput(msg)) => assert_eq!(msg, "not an array"),
            _ => panic!("Expected InvalidInput to propagate"),
        }
    }

    #[test]
    fn test_error_size() {
        let size = std::mem::size_of::<DocpartError>();
        assert!(
            size < 256,
            "DocpartError size is {size} bytes, consider boxing large variants"
        );
    }
}
