//! # Docpart Core - Element Model and Text Classification
//!
//! Docpart normalizes heterogeneous document representations (HTML, plain
//! text, layout-detector output) into one ordered sequence of typed elements:
//! titles, narrative text, list items, tables, addresses, checkboxes and more.
//! This crate holds everything that does not depend on a particular input
//! format; the partitioners live in `docpart-backend`.
//!
//! ## Quick Start
//!
//! ```
//! use docpart_core::classify::TextClassifier;
//! use docpart_core::{elements_from_json, elements_to_json, Element, ElementMetadata};
//!
//! let classifier = TextClassifier::default();
//! let text = "The committee approved the budget on Tuesday.";
//! let element = if classifier.is_possible_narrative_text(text, 0.3) {
//!     Element::narrative_text(text)
//! } else {
//!     Element::text(text)
//! };
//! let element = element.with_metadata(ElementMetadata::default().with_page_number(1));
//!
//! let json = elements_to_json(&[element.clone()])?;
//! assert_eq!(elements_from_json(&json)?, vec![element]);
//! # Ok::<(), docpart_core::DocpartError>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`element`] | `Element`, `ElementType`, ids, `apply`, tag context |
//! | [`metadata`] | sparse `ElementMetadata`, coordinates, data source |
//! | [`coordinates`] | coordinate systems and conversions |
//! | [`nlp`] | tokenizer / sentence splitter / tagger seam |
//! | [`classify`] | title, narrative, bullet, list and pattern classifiers |
//! | [`cleaners`] | text transforms usable with `Element::apply` |
//! | [`extract`] | header metadata extractors |
//! | [`serializer`] | JSON, NDJSON, records, flattening, compact transport |

pub mod classify;
pub mod cleaners;
pub mod coordinates;
pub mod element;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod nlp;
pub mod patterns;
pub mod serializer;

// Re-exports for convenience
pub use coordinates::{CoordinateSystem, Orientation, Point};
pub use element::{
    content_hash_id, Element, ElementType, EmphasizedText, FallibleTransform, IdMode, Link,
    TagContext, TextTransform,
};
pub use error::*;
pub use metadata::{CoordinatesMetadata, DataSourceMetadata, ElementMetadata};
pub use serializer::*;
