//! Flattening of nested records into single-level maps
//!
//! Used to turn element records into rows for tabular sinks: nested keys are
//! joined with a separator, so `{"metadata": {"page_number": 1}}` becomes
//! `{"metadata_page_number": 1}`.

use crate::element::Element;
use crate::error::Result;
use serde_json::{Map, Value};

/// Options for [`flatten`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Joins parent and child keys (default: `"_"`)
    pub separator: String,
    /// Expand sequences into index-suffixed keys (default: false)
    pub flatten_sequences: bool,
    /// Drop null values, including null sequence items (default: false)
    pub remove_absent: bool,
    /// Keys whose values are kept as-is, matched against either the joined key
    /// or the bare key
    pub keys_to_omit: Vec<String>,
}

impl Default for FlattenOptions {
    #[inline]
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            flatten_sequences: false,
            remove_absent: false,
            keys_to_omit: Vec::new(),
        }
    }
}

impl FlattenOptions {
    #[inline]
    #[must_use = "returns options with the separator configured"]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[inline]
    #[must_use = "returns options with sequence flattening configured"]
    pub const fn with_flatten_sequences(mut self, enable: bool) -> Self {
        self.flatten_sequences = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with absent value removal configured"]
    pub const fn with_remove_absent(mut self, enable: bool) -> Self {
        self.remove_absent = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with omitted keys configured"]
    pub fn with_keys_to_omit(mut self, keys: Vec<String>) -> Self {
        self.keys_to_omit = keys;
        self
    }

    fn omits(&self, joined_key: &str, bare_key: &str) -> bool {
        self.keys_to_omit
            .iter()
            .any(|omitted| omitted == joined_key || omitted == bare_key)
    }
}

/// Flattens a nested mapping.
///
/// # Examples
///
/// ```
/// use docpart_core::serializer::{flatten, FlattenOptions};
/// use serde_json::json;
///
/// let record = json!({"a": {"b": 1, "c": [1, 2]}}).as_object().unwrap().clone();
///
/// let flat = flatten(&record, &FlattenOptions::default());
/// assert_eq!(serde_json::Value::Object(flat), json!({"a_b": 1, "a_c": [1, 2]}));
///
/// let options = FlattenOptions::default().with_flatten_sequences(true);
/// let flat = flatten(&record, &options);
/// assert_eq!(serde_json::Value::Object(flat), json!({"a_b": 1, "a_c_0": 1, "a_c_1": 2}));
/// ```
#[must_use = "returns the flattened mapping"]
pub fn flatten(mapping: &Map<String, Value>, options: &FlattenOptions) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, None, mapping, options);
    flat
}

fn join_key(parent: Option<&str>, key: &str, separator: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}{separator}{key}"),
        None => key.to_string(),
    }
}

fn flatten_into(
    flat: &mut Map<String, Value>,
    parent: Option<&str>,
    mapping: &Map<String, Value>,
    options: &FlattenOptions,
) {
    for (key, value) in mapping {
        let joined = join_key(parent, key, &options.separator);
        if options.omits(&joined, key) {
            flat.insert(joined, value.clone());
            continue;
        }
        flatten_value(flat, joined, value, options);
    }
}

fn flatten_value(flat: &mut Map<String, Value>, key: String, value: &Value, options: &FlattenOptions) {
    match value {
        Value::Object(nested) => flatten_into(flat, Some(&key), nested, options),
        Value::Array(items) if options.flatten_sequences => {
            for (index, item) in items.iter().enumerate() {
                let item_key = join_key(Some(&key), &index.to_string(), &options.separator);
                flatten_value(flat, item_key, item, options);
            }
        }
        Value::Null if options.remove_absent => {}
        _ => {
            flat.insert(key, value.clone());
        }
    }
}

/// Element records flattened with `options`, one map per element.
///
/// # Errors
///
/// Returns [`DocpartError::JsonError`](crate::DocpartError::JsonError) if an
/// element cannot be encoded.
pub fn convert_to_flat_records(
    elements: &[Element],
    options: &FlattenOptions,
) -> Result<Vec<Map<String, Value>>> {
    elements
        .iter()
        .map(|element| {
            let record = element.to_record()?;
            Ok(match record {
                Value::Object(mapping) => flatten(&mapping, options),
                _ => Map::new(),
            })
        })
        .collect()
}
