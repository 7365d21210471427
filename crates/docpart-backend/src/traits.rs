//! Core trait definitions for partitioners

// Clippy pedantic allows:
// - HtmlOptions uses multiple bool flags for feature toggles
#![allow(clippy::struct_excessive_bools)]

use docpart_core::{CoordinateSystem, DocpartError, Element, Result};
use std::path::Path;

/// Default breadth guard for the bullet look-ahead heuristic.
///
/// A bullet-only node whose own subtree has more descendants than this is
/// not treated as a list marker. Text-leaf candidates get five extra nodes of
/// slack on top of it.
pub const DEFAULT_MAX_PREDECESSOR_LEN: usize = 15;

/// Kind of input a partitioner accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// HTML markup
    Html,
    /// Plain text
    Text,
    /// A JSON array of layout-detector records
    LayoutJson,
}

impl std::fmt::Display for InputKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::LayoutJson => "layout-json",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "layout-json" | "layout" => Ok(Self::LayoutJson),
            _ => Err(format!("unknown input kind: '{s}'")),
        }
    }
}

/// Options for HTML partitioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Drop elements inside `<header>` / `<footer>`, and everything after the
    /// first footer element on its page (default: false)
    pub skip_headers_and_footers: bool,

    /// Drop elements produced from table markup (default: false)
    pub skip_table_text: bool,

    /// Walk each `<article>` separately instead of the whole root
    /// (default: true)
    pub assemble_articles: bool,

    /// Emit a `PageBreak` element between pages (default: false)
    pub include_page_breaks: bool,

    /// Breadth guard for candidate blocks (default: 15)
    pub max_predecessor_len: usize,

    /// Stamped into `metadata.filename` of every element
    pub metadata_filename: Option<String>,

    /// Stamped into `metadata.url` of every element
    pub metadata_url: Option<String>,

    /// Stamped into `metadata.last_modified` of every element
    pub last_modified: Option<String>,
}

impl Default for HtmlOptions {
    #[inline]
    fn default() -> Self {
        Self {
            skip_headers_and_footers: false,
            skip_table_text: false,
            assemble_articles: true,
            include_page_breaks: false,
            max_predecessor_len: DEFAULT_MAX_PREDECESSOR_LEN,
            metadata_filename: None,
            metadata_url: None,
            last_modified: None,
        }
    }
}

impl HtmlOptions {
    #[inline]
    #[must_use = "returns options with header/footer skipping configured"]
    pub const fn with_skip_headers_and_footers(mut self, enable: bool) -> Self {
        self.skip_headers_and_footers = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with table text skipping configured"]
    pub const fn with_skip_table_text(mut self, enable: bool) -> Self {
        self.skip_table_text = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with article assembly configured"]
    pub const fn with_assemble_articles(mut self, enable: bool) -> Self {
        self.assemble_articles = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with page break elements configured"]
    pub const fn with_page_breaks(mut self, enable: bool) -> Self {
        self.include_page_breaks = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with the breadth guard configured"]
    pub const fn with_max_predecessor_len(mut self, max_predecessor_len: usize) -> Self {
        self.max_predecessor_len = max_predecessor_len;
        self
    }

    #[inline]
    #[must_use = "returns options with the source filename configured"]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.metadata_filename = Some(filename.into());
        self
    }

    #[inline]
    #[must_use = "returns options with the source url configured"]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = Some(url.into());
        self
    }

    #[inline]
    #[must_use = "returns options with the last-modified stamp configured"]
    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }
}

/// Options for layout normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Split `List` blocks into one `ListItem` per entry (default: true)
    pub infer_list_items: bool,

    /// Frame of the detector's boxes. Required when records carry
    /// coordinates (default: None)
    pub coordinate_system: Option<CoordinateSystem>,
}

impl Default for LayoutOptions {
    #[inline]
    fn default() -> Self {
        Self {
            infer_list_items: true,
            coordinate_system: None,
        }
    }
}

impl LayoutOptions {
    #[inline]
    #[must_use = "returns options with list item inference configured"]
    pub const fn with_infer_list_items(mut self, enable: bool) -> Self {
        self.infer_list_items = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with the coordinate system configured"]
    pub const fn with_coordinate_system(mut self, system: CoordinateSystem) -> Self {
        self.coordinate_system = Some(system);
        self
    }
}

/// How plain text is cut into paragraphs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParagraphSplit {
    /// Every non-empty line is a paragraph
    Line,
    /// Paragraphs are separated by blank lines; single newlines are joined
    #[default]
    BlankLine,
}

/// Options for plain-text partitioning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    pub paragraph_split: ParagraphSplit,
    /// Stamped into `metadata.filename` of every element
    pub metadata_filename: Option<String>,
}

impl TextOptions {
    #[inline]
    #[must_use = "returns options with paragraph splitting configured"]
    pub const fn with_paragraph_split(mut self, paragraph_split: ParagraphSplit) -> Self {
        self.paragraph_split = paragraph_split;
        self
    }

    #[inline]
    #[must_use = "returns options with the source filename configured"]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.metadata_filename = Some(filename.into());
        self
    }
}

/// Trait for turning one input document into an ordered element sequence
pub trait Partitioner: Send + Sync {
    /// Options accepted by this partitioner
    type Options;

    /// Get the input kind this partitioner handles
    fn input_kind(&self) -> InputKind;

    /// Partition a document held in memory
    ///
    /// # Errors
    /// Returns an error if the input is malformed.
    fn partition_str(&self, input: &str, options: &Self::Options) -> Result<Vec<Element>>;

    /// Partition a document from bytes
    ///
    /// # Errors
    /// Returns [`DocpartError::InvalidInput`] if the bytes are not UTF-8, or
    /// any error from [`Partitioner::partition_str`].
    fn partition_bytes(&self, data: &[u8], options: &Self::Options) -> Result<Vec<Element>> {
        let input = std::str::from_utf8(data)
            .map_err(|e| DocpartError::InvalidInput(format!("Invalid UTF-8: {e}")))?;
        self.partition_str(input, options)
    }

    /// Partition a document from a file path
    ///
    /// # Errors
    /// Returns an error if file reading or partitioning fails.
    fn partition_file<P: AsRef<Path>>(&self, path: P, options: &Self::Options) -> Result<Vec<Element>>
    where
        Self: Sized,
    {
        let data = std::fs::read(path.as_ref())?;
        self.partition_bytes(&data, options)
    }

    /// Check if this partitioner can handle the given input kind
    fn can_handle(&self, kind: InputKind) -> bool {
        self.input_kind() == kind
    }
}
