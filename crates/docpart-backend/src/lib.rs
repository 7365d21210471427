//! Partitioning backends for `docpart`
//!
//! This crate turns one input document into an ordered sequence of
//! [`Element`]s. Three inputs are supported, each behind the [`Partitioner`]
//! trait:
//!
//! | Input | Partitioner | Entry point |
//! |-------|-------------|-------------|
//! | HTML | [`HtmlPartitioner`] | [`partition_html`] |
//! | Plain text | [`TextPartitioner`] | [`partition_text`] |
//! | Layout-detector JSON | [`LayoutNormalizer`] | [`normalize_layout_elements`] |
//!
//! # Architecture
//!
//! ```text
//!   HTML bytes ──► scraper DOM ──► HtmlPartitioner walk ──► HtmlDocument (pages)
//!                                                               │
//!                                              apply_cleaners (skip header/footer, tables)
//!                                                               │
//!   plain text ──► TextPartitioner ─────────────────┐           ▼
//!                                                   ├──► Vec<Element> ──► docpart_core::serializer
//!   layout JSON ──► LayoutNormalizer ───────────────┘
//! ```
//!
//! Classification (title, narrative, bullets, addresses) lives in
//! [`docpart_core::classify`] and is shared by every partitioner.
//!
//! # Usage
//!
//! ```
//! use docpart_backend::{partition_html, HtmlOptions};
//! use docpart_core::ElementType;
//!
//! let html = "<html><body><h1>Overview</h1>\
//!             <p>The committee approved the budget on Tuesday.</p></body></html>";
//! let elements = partition_html(html, &HtmlOptions::default())?;
//!
//! assert_eq!(elements[0].element_type, ElementType::Title);
//! assert_eq!(elements[1].element_type, ElementType::NarrativeText);
//! assert_eq!(elements[1].metadata.page_number, Some(1));
//! # Ok::<(), docpart_core::DocpartError>(())
//! ```
//!
//! Partitioners hold no mutable state, so one instance can be shared across
//! threads and documents.
//!
//! [`Element`]: docpart_core::Element

pub mod html;
pub mod layout;
pub mod table;
pub mod text;
pub mod traits;
pub mod utils;

pub use html::{partition_html, HtmlDocument, HtmlPage, HtmlPartitioner};
pub use layout::{
    normalize_layout_element, normalize_layout_elements, LayoutElement, LayoutNormalizer,
};
pub use table::{HtmlTableRenderer, TableRenderer};
pub use text::{partition_text, TextPartitioner};
pub use traits::*;
