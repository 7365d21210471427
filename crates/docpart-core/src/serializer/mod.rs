//! Element serialization module
//!
//! This module provides the encodings used to exchange element sequences:
//! JSON arrays, NDJSON, plain records, flattened records and a compact
//! base64(gzip(JSON)) transport form.

pub mod compress;
pub mod flatten;
pub mod json;

pub use compress::{
    compress_str, decompress_str, elements_from_base64_gzipped_json,
    elements_to_base64_gzipped_json,
};
pub use flatten::{convert_to_flat_records, flatten, FlattenOptions};
pub use json::{
    elements_from_json, elements_from_ndjson, elements_from_records, elements_to_json,
    elements_to_ndjson, elements_to_records, JsonOptions, JsonSerializer,
};
