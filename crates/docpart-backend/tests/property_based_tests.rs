//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants of the
//! partitioners on generated input:
//! - HTML and plain-text partitioning never panic
//! - Page numbers start at 1 and never decrease
//! - Filtering only ever removes elements

use docpart_backend::{
    normalize_layout_elements, partition_html, partition_text, HtmlOptions, LayoutElement,
    LayoutOptions, ParagraphSplit, TextOptions,
};
use docpart_core::{Element, ElementType};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn words() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,10}( [A-Za-z]{1,10}){0,8}[.!]?"
}

/// Markup from a small vocabulary, nested up to a few levels.
fn html_fragment() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        words(),
        words().prop_map(|w| format!("<p>{w}</p>")),
        words().prop_map(|w| format!("<h2>{w}</h2>")),
        words().prop_map(|w| format!("<li>{w}</li>")),
        words().prop_map(|w| format!("<p>• {w}</p>")),
        words().prop_map(|w| format!("<td>{w}</td>")),
        Just("<hr>".to_string()),
        Just("<br>".to_string()),
        Just("<p>•</p>".to_string()),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        let tags = prop::sample::select(vec![
            "div", "ul", "ol", "header", "footer", "article", "table", "tr", "span", "section",
        ]);
        (tags, prop::collection::vec(inner, 0..6))
            .prop_map(|(tag, children)| format!("<{tag}>{}</{tag}>", children.concat()))
    })
}

fn summary(elements: &[Element]) -> Vec<(ElementType, String)> {
    elements
        .iter()
        .map(|e| (e.element_type, e.text.clone()))
        .collect()
}

fn is_subsequence<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|item| rest.any(|candidate| candidate == item))
}

// ============================================================================
// HTML
// ============================================================================

/// Property: page numbers start at 1 and are non-decreasing
#[test]
fn proptest_html_page_numbers_monotonic() {
    proptest!(|(body in html_fragment())| {
        let html = format!("<html><body>{body}</body></html>");
        let elements = partition_html(&html, &HtmlOptions::default()).unwrap();
        let pages: Vec<usize> = elements
            .iter()
            .map(|e| e.metadata.page_number.unwrap_or(0))
            .collect();
        prop_assert!(pages.iter().all(|&page| page >= 1), "pages: {:?}", pages);
        prop_assert!(pages.windows(2).all(|w| w[0] <= w[1]), "pages: {:?}", pages);
    });
}

/// Property: skipping headers, footers and tables only removes elements
#[test]
fn proptest_html_filtering_removes_only() {
    proptest!(|(body in html_fragment())| {
        let html = format!("<html><body>{body}</body></html>");
        let all = partition_html(&html, &HtmlOptions::default()).unwrap();
        let options = HtmlOptions::default()
            .with_skip_headers_and_footers(true)
            .with_skip_table_text(true);
        let filtered = partition_html(&html, &options).unwrap();
        prop_assert!(filtered.len() <= all.len());
        prop_assert!(is_subsequence(&summary(&filtered), &summary(&all)));
        prop_assert!(filtered.iter().all(|e| e.element_type != ElementType::Table));
    });
}

/// Property: arbitrary text inside a paragraph never panics
#[test]
fn proptest_html_arbitrary_text_no_panic() {
    proptest!(|(text in "\\PC{0,200}")| {
        let html = format!("<p>{}</p>", text.replace('<', "&lt;"));
        let _ = partition_html(&html, &HtmlOptions::default()).unwrap();
    });
}

// ============================================================================
// Plain text and layout
// ============================================================================

/// Property: every element comes from a distinct paragraph
#[test]
fn proptest_text_at_most_one_element_per_line() {
    proptest!(|(lines in prop::collection::vec(words(), 0..12))| {
        let text = lines.join("\n");
        let options = TextOptions::default().with_paragraph_split(ParagraphSplit::Line);
        let elements = partition_text(&text, &options).unwrap();
        prop_assert!(elements.len() <= lines.len());
        prop_assert!(elements.iter().all(|e| e.metadata.page_number == Some(1)));
    });
}

/// Property: unknown labels never fail and keep their text
#[test]
fn proptest_layout_unknown_labels_fall_back() {
    proptest!(|(label in "x-[a-z]{6,14}", text in words())| {
        let layouts = vec![LayoutElement::new(label, text.clone())];
        let elements = normalize_layout_elements(&layouts, &LayoutOptions::default()).unwrap();
        prop_assert_eq!(elements.len(), 1);
        prop_assert_eq!(elements[0].element_type, ElementType::Text);
        prop_assert_eq!(&elements[0].text, text.trim());
    });
}
