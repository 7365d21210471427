//! JSON, NDJSON and record encodings of element sequences
//!
//! Elements already implement `Serialize`/`Deserialize` in their record form,
//! so this is mostly a convenience layer with formatting options and
//! descriptive errors for payloads of the wrong shape.

use crate::element::Element;
use crate::error::{DocpartError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Options for JSON serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonOptions {
    /// Pretty-print with indentation (default: true)
    pub pretty: bool,
    /// Indentation string when pretty=true (default: 2 spaces)
    pub indent: String,
}

impl Default for JsonOptions {
    #[inline]
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl JsonOptions {
    /// Single-line output.
    #[inline]
    #[must_use = "creates compact JSON options"]
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: String::new(),
        }
    }

    #[inline]
    #[must_use = "returns options with the indentation configured"]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// JSON serializer for element sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonSerializer {
    options: JsonOptions,
}

impl JsonSerializer {
    /// Create a new JSON serializer with default options (pretty-printed)
    #[inline]
    #[must_use = "creates serializer with default options"]
    pub fn new() -> Self {
        Self {
            options: JsonOptions::default(),
        }
    }

    /// Create a new JSON serializer with custom options
    #[inline]
    #[must_use = "creates serializer with custom options"]
    pub const fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    /// Serialize elements to a JSON array
    ///
    /// # Errors
    /// Returns error if a metadata value cannot be represented in JSON
    pub fn serialize_elements(&self, elements: &[Element]) -> Result<String> {
        to_json_string(elements, &self.options)
    }
}

fn to_json_string<T: Serialize + ?Sized>(value: &T, options: &JsonOptions) -> Result<String> {
    if !options.pretty {
        return Ok(serde_json::to_string(value)?);
    }
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(options.indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| DocpartError::InvalidInput(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Elements as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`DocpartError::JsonError`] if a metadata value cannot be
/// represented in JSON.
pub fn elements_to_json(elements: &[Element]) -> Result<String> {
    JsonSerializer::new().serialize_elements(elements)
}

/// Parses a JSON array of element records.
///
/// Unknown keys are ignored, and unknown element types become
/// `UncategorizedText`.
///
/// # Errors
///
/// Returns [`DocpartError::JsonError`] for malformed JSON or records, and
/// [`DocpartError::InvalidInput`] when the payload is not an array.
pub fn elements_from_json(json: &str) -> Result<Vec<Element>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => elements_from_records(records),
        other => Err(DocpartError::InvalidInput(format!(
            "expected a JSON array of element records, found {}",
            json_kind(&other)
        ))),
    }
}

/// Elements as newline-delimited JSON, one compact record per line.
///
/// # Errors
///
/// Returns [`DocpartError::JsonError`] if a metadata value cannot be
/// represented in JSON.
pub fn elements_to_ndjson(elements: &[Element]) -> Result<String> {
    let mut output = String::new();
    for element in elements {
        output.push_str(&serde_json::to_string(element)?);
        output.push('\n');
    }
    Ok(output)
}

/// Parses newline-delimited element records. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`DocpartError::InvalidInput`] naming the first line that is not a
/// valid element record.
pub fn elements_from_ndjson(ndjson: &str) -> Result<Vec<Element>> {
    ndjson
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Element>(line).map_err(|e| {
                DocpartError::InvalidInput(format!("line {}: invalid element record: {e}", index + 1))
            })
        })
        .collect()
}

/// Elements as JSON records.
///
/// # Errors
///
/// Returns [`DocpartError::JsonError`] if a metadata value cannot be
/// represented in JSON.
pub fn elements_to_records(elements: &[Element]) -> Result<Vec<Value>> {
    elements.iter().map(Element::to_record).collect()
}

/// Rebuilds elements from JSON records.
///
/// # Errors
///
/// Returns [`DocpartError::InvalidInput`] for a record that is not an object,
/// and [`DocpartError::JsonError`] for an object that is not a valid record.
pub fn elements_from_records(records: Vec<Value>) -> Result<Vec<Element>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            if !record.is_object() {
                return Err(DocpartError::InvalidInput(format!(
                    "element record {index} is {}, expected an object",
                    json_kind(&record)
                )));
            }
            Element::from_record(record)
        })
        .collect()
}
