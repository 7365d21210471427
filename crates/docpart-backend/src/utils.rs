//! Shared utility functions for partitioner implementations.

// Clippy pedantic allows:
// - Character offsets are stored as i64 to allow the -1 "not found" marker
#![allow(clippy::cast_possible_wrap)]

use docpart_core::cleaners::replace_unicode_quotes;
use docpart_core::{Element, ElementMetadata, EmphasizedText, Link};

/// Collapse all whitespace runs (including non-breaking spaces and newlines)
/// into single spaces, repair mis-encoded quotes, and trim.
///
/// Markup whitespace carries no meaning, so every partitioner normalizes
/// extracted text through this before classifying it.
#[must_use = "returns the normalized text"]
pub fn normalize_text(text: &str) -> String {
    replace_unicode_quotes(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character offset of `needle` inside `haystack`, or `-1` when absent.
#[must_use = "returns the character offset"]
pub fn char_offset(haystack: &str, needle: &str) -> i64 {
    if needle.is_empty() {
        return -1;
    }
    haystack
        .find(needle)
        .map_or(-1, |byte| haystack[..byte].chars().count() as i64)
}

/// Zero-based heading level of `h1`..`h6`.
#[inline]
#[must_use = "returns the heading depth"]
pub fn heading_depth(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(0),
        "h2" => Some(1),
        "h3" => Some(2),
        "h4" => Some(3),
        "h5" => Some(4),
        "h6" => Some(5),
        _ => None,
    }
}

/// Copy links into the parallel metadata lists.
pub(crate) fn stamp_links(metadata: &mut ElementMetadata, links: &[Link]) {
    for link in links {
        metadata.link_texts.push(link.text.clone());
        metadata.link_urls.push(link.url.clone());
        metadata.link_start_indexes.push(link.start_index);
    }
}

/// Copy emphasized runs into the parallel metadata lists.
pub(crate) fn stamp_emphasis(metadata: &mut ElementMetadata, emphasized: &[EmphasizedText]) {
    for run in emphasized {
        metadata.emphasized_text_contents.push(run.text.clone());
        metadata.emphasized_text_tags.push(run.tag.clone());
    }
}

/// Source fields shared by every element of one document.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SourceStamp<'a> {
    pub filename: Option<&'a str>,
    pub url: Option<&'a str>,
    pub last_modified: Option<&'a str>,
}

impl SourceStamp<'_> {
    /// Fill source fields and the page number. Fields already set are kept.
    pub(crate) fn apply(&self, element: &mut Element, page_number: usize) {
        let metadata = &mut element.metadata;
        metadata.page_number.get_or_insert(page_number);
        if let Some(filename) = self.filename {
            metadata.filename.get_or_insert_with(|| filename.to_string());
        }
        if let Some(url) = self.url {
            metadata.url.get_or_insert_with(|| url.to_string());
        }
        if let Some(last_modified) = self.last_modified {
            metadata
                .last_modified
                .get_or_insert_with(|| last_modified.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello,\n\t  world\u{a0}! "), "Hello, world !");
        assert_eq!(normalize_text("\u{0093}quoted\u{0094}"), "\u{201C}quoted\u{201D}");
        assert_eq!(normalize_text(" \n "), "");
    }

    #[test]
    fn test_char_offset() {
        assert_eq!(char_offset("Read the docs here", "docs"), 9);
        assert_eq!(char_offset("Café menu", "menu"), 5, "offset counts characters");
        assert_eq!(char_offset("abc", "xyz"), -1);
        assert_eq!(char_offset("abc", ""), -1);
    }

    #[test]
    fn test_heading_depth() {
        assert_eq!(heading_depth("h1"), Some(0));
        assert_eq!(heading_depth("h6"), Some(5));
        assert_eq!(heading_depth("p"), None);
    }

    #[test]
    fn test_stamp_links_and_emphasis() {
        let mut metadata = ElementMetadata::default();
        stamp_links(
            &mut metadata,
            &[Link {
                text: "docs".into(),
                url: "https://example.com".into(),
                start_index: 4,
            }],
        );
        stamp_emphasis(
            &mut metadata,
            &[EmphasizedText {
                text: "Note".into(),
                tag: "b".into(),
            }],
        );
        assert_eq!(metadata.link_urls, vec!["https://example.com"]);
        assert_eq!(metadata.link_start_indexes, vec![4]);
        assert_eq!(metadata.emphasized_text_tags, vec!["b"]);
    }

    #[test]
    fn test_source_stamp_keeps_existing_fields() {
        let stamp = SourceStamp {
            filename: Some("a.html"),
            url: None,
            last_modified: Some("2024-01-01"),
        };
        let mut element = Element::title("Intro")
            .with_metadata(ElementMetadata::default().with_page_number(7));
        stamp.apply(&mut element, 1);
        assert_eq!(element.metadata.page_number, Some(7));
        assert_eq!(element.metadata.filename.as_deref(), Some("a.html"));
        assert_eq!(element.metadata.last_modified.as_deref(), Some("2024-01-01"));
        assert_eq!(element.metadata.url, None);
    }
}
