//! HTML Partitioner
//!
//! Turns an HTML document into an ordered sequence of typed elements.
//!
//! # Algorithm
//!
//! 1. Root selection: the first `<main>` if present, else the whole document.
//! 2. Article segmentation: each outermost `<article>`, else each outermost
//!    `div[itemprop=articleBody]`, else the root (only when
//!    `assemble_articles` is set).
//! 3. A pre-order walk of each article. Nodes folded into an emitted element
//!    are recorded in a consumed set and never visited again. Each visited
//!    node is dispatched by the first rule that matches:
//!    - text leaf (`p`, `a`, `td`, `span`, `font`, headings, `br`, childless
//!      `div`/`pre`/`body`, or a `div` of bulleted spans), unfurled at `<br>`
//!    - container with leading text of its own
//!    - table whose rows are all bulleted, one list item per row
//!    - list item (`li`, `dd`) or a bulleted block, with a look-ahead to the
//!      next sibling when the block is only a bullet glyph
//!    - table without nested tables
//!    - `<hr>`, which starts a new page
//! 4. Post-filter ([`HtmlDocument::doc_after_cleaners`]) drops table and
//!    header/footer elements on request, and pages left empty.
//!
//! The walk is iterative, so deep documents do not grow the stack.

use crate::table::{table_text, HtmlTableRenderer, TableRenderer};
use crate::traits::{HtmlOptions, InputKind, Partitioner};
use crate::utils::{
    char_offset, heading_depth, normalize_text, stamp_emphasis, stamp_links, SourceStamp,
};
use docpart_core::classify::{
    is_bulleted_text, is_email_address, is_us_city_state_zip, TextClassifier,
    DEFAULT_CAP_THRESHOLD, DEFAULT_SENTENCE_MIN_LENGTH,
};
use docpart_core::cleaners::clean_bullets;
use docpart_core::{
    DocpartError, Element, ElementMetadata, ElementType, EmphasizedText, Link, Result, TagContext,
};
use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;

const TEXT_TAGS: &[&str] = &["p", "a", "td", "span", "font"];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const TEXTBREAK_TAGS: &[&str] = &["br"];
const PAGEBREAK_TAGS: &[&str] = &["hr"];
const LIST_TAGS: &[&str] = &["ul", "ol", "dl"];
const LIST_ITEM_TAGS: &[&str] = &["li", "dd"];
const SECTION_TAGS: &[&str] = &["div", "pre"];
const TABLE_TAGS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "td", "th"];
const HEADER_OR_FOOTER_TAGS: &[&str] = &["header", "footer"];
const EMPHASIS_TAGS: &[&str] = &["strong", "em", "b", "i"];
/// Subtrees that never contribute text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// One page of partitioned elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlPage {
    /// Zero-based position of the page before any filtering
    pub number: usize,
    pub elements: Vec<Element>,
}

/// Pages produced by the walk, before page numbers are stamped.
///
/// Every element carries a [`TagContext`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlDocument {
    pub pages: Vec<HtmlPage>,
}

/// Predicate over an element's markup context; `true` drops the element.
pub type ElementExcluder = fn(&TagContext) -> bool;

/// True for elements produced from table markup.
#[must_use = "returns whether the element came from a table"]
pub fn in_table(context: &TagContext) -> bool {
    context.has_tag_or_ancestor_in(TABLE_TAGS)
}

/// True for elements inside `<header>` or `<footer>`.
#[must_use = "returns whether the element came from a header or footer"]
pub fn in_header_or_footer(context: &TagContext) -> bool {
    context.has_tag_or_ancestor_in(HEADER_OR_FOOTER_TAGS)
}

fn in_footer(context: &TagContext) -> bool {
    context.has_tag_or_ancestor_in(&["footer"])
}

impl HtmlDocument {
    /// All elements, page by page.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|page| page.elements.iter())
    }

    /// A filtered copy of the document.
    ///
    /// With `skip_table_text`, elements with a table tag or ancestor are
    /// dropped. With `skip_headers_and_footers`, elements inside `<header>` or
    /// `<footer>` are dropped, as is everything after the first footer element
    /// of a page. Pages left without elements are removed.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::MissingTagContext`] if an element has no tag
    /// context.
    pub fn doc_after_cleaners(
        &self,
        skip_headers_and_footers: bool,
        skip_table_text: bool,
    ) -> Result<Self> {
        self.check_tag_context()?;
        Ok(Self {
            pages: filter_pages(
                self.pages.clone(),
                skip_headers_and_footers,
                skip_table_text,
            ),
        })
    }

    /// In-place variant of [`HtmlDocument::doc_after_cleaners`]. The document
    /// is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::MissingTagContext`] if an element has no tag
    /// context.
    pub fn apply_cleaners(
        &mut self,
        skip_headers_and_footers: bool,
        skip_table_text: bool,
    ) -> Result<()> {
        self.check_tag_context()?;
        let pages = std::mem::take(&mut self.pages);
        self.pages = filter_pages(pages, skip_headers_and_footers, skip_table_text);
        Ok(())
    }

    fn check_tag_context(&self) -> Result<()> {
        match self.elements().find(|element| element.tag_context.is_none()) {
            Some(element) => Err(DocpartError::MissingTagContext(format!(
                "{} element '{}' has no tag or ancestor tags",
                element.category(),
                element.text
            ))),
            None => Ok(()),
        }
    }

    /// Flatten into one sequence, stamping 1-based page numbers and the
    /// source fields from `options`.
    #[must_use = "returns the element sequence"]
    pub fn into_elements(self, options: &HtmlOptions) -> Vec<Element> {
        let stamp = SourceStamp {
            filename: options.metadata_filename.as_deref(),
            url: options.metadata_url.as_deref(),
            last_modified: options.last_modified.as_deref(),
        };
        let mut elements = Vec::new();
        for (index, page) in self.pages.into_iter().enumerate() {
            if options.include_page_breaks && index > 0 {
                let mut page_break = Element::page_break();
                stamp.apply(&mut page_break, index);
                elements.push(page_break);
            }
            for mut element in page.elements {
                stamp.apply(&mut element, index + 1);
                elements.push(element);
            }
        }
        elements
    }
}

fn filter_pages(
    pages: Vec<HtmlPage>,
    skip_headers_and_footers: bool,
    skip_table_text: bool,
) -> Vec<HtmlPage> {
    let mut excluders: Vec<ElementExcluder> = Vec::new();
    if skip_table_text {
        excluders.push(in_table);
    }
    if skip_headers_and_footers {
        excluders.push(in_header_or_footer);
    }

    pages
        .into_iter()
        .filter_map(|page| {
            let mut kept = Vec::with_capacity(page.elements.len());
            for element in page.elements {
                let (footer, excluded) = match element.tag_context.as_ref() {
                    Some(context) => (
                        in_footer(context),
                        excluders.iter().any(|exclude| exclude(context)),
                    ),
                    None => (false, false),
                };
                if skip_headers_and_footers && footer {
                    log::debug!("footer reached, dropping the rest of page {}", page.number);
                    break;
                }
                if !excluded {
                    kept.push(element);
                }
            }
            if kept.is_empty() {
                log::debug!("page {} is empty after filtering", page.number);
                return None;
            }
            Some(HtmlPage {
                number: page.number,
                elements: kept,
            })
        })
        .collect()
}

/// Accumulates elements into pages.
#[derive(Debug, Default)]
struct PageBuilder {
    pages: Vec<HtmlPage>,
    current: Vec<Element>,
}

impl PageBuilder {
    fn push(&mut self, element: Element) {
        self.current.push(element);
    }

    fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.current.extend(elements);
    }

    /// Close the current page if it has elements.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let number = self.pages.len();
        self.pages.push(HtmlPage {
            number,
            elements: std::mem::take(&mut self.current),
        });
    }

    fn finish(mut self) -> HtmlDocument {
        self.flush();
        HtmlDocument { pages: self.pages }
    }
}

/// Text gathered from a subtree, with the links and emphasis found in it.
#[derive(Debug, Default)]
struct TextRun {
    text: String,
    links: Vec<(String, String)>,
    emphasized: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct CollectOptions {
    /// Start a new run at each `<br>`; otherwise a break is a space
    split_at_breaks: bool,
    /// Leave nested `ul`/`ol`/`dl` subtrees out
    skip_nested_lists: bool,
    /// Append the text that directly follows the element
    include_tail: bool,
}

#[derive(Debug)]
struct Collected {
    runs: Vec<TextRun>,
    /// Descendants whose text was gathered
    visited: Vec<NodeId>,
}

fn is_pruned(name: &str, options: CollectOptions) -> bool {
    SKIPPED_TAGS.contains(&name) || (options.skip_nested_lists && LIST_TAGS.contains(&name))
}

fn collect_text(element: ElementRef<'_>, options: CollectOptions) -> Collected {
    let mut runs = Vec::new();
    let mut current = TextRun::default();
    let mut visited = Vec::new();
    let mut pruned_depth = 0usize;

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => {
                let is_root = node.id() == element.id();
                if let Node::Element(tag) = node.value() {
                    if !is_root && is_pruned(tag.name(), options) {
                        pruned_depth += 1;
                        continue;
                    }
                }
                if pruned_depth > 0 {
                    continue;
                }
                if !is_root {
                    visited.push(node.id());
                }
                match node.value() {
                    Node::Text(text) => current.text.push_str(text),
                    Node::Element(tag) => {
                        let name = tag.name();
                        if !is_root && TEXTBREAK_TAGS.contains(&name) {
                            if options.split_at_breaks {
                                runs.push(std::mem::take(&mut current));
                            } else {
                                current.text.push(' ');
                            }
                            continue;
                        }
                        let Some(child) = ElementRef::wrap(node) else {
                            continue;
                        };
                        if let Some(href) = tag.attr("href") {
                            current.links.push((element_text(child), href.to_string()));
                        }
                        if EMPHASIS_TAGS.contains(&name) {
                            current
                                .emphasized
                                .push((element_text(child), name.to_string()));
                        }
                    }
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Node::Element(tag) = node.value() {
                    if node.id() != element.id() && is_pruned(tag.name(), options) {
                        pruned_depth = pruned_depth.saturating_sub(1);
                    }
                }
            }
        }
    }
    if options.include_tail {
        current.text.push_str(&tail_text(element));
    }
    runs.push(current);
    Collected { runs, visited }
}

/// Concatenated descendant text.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text nodes directly following the element, up to the next element.
fn tail_text(element: ElementRef<'_>) -> String {
    element
        .next_siblings()
        .map_while(|node| node.value().as_text().map(|text| text.to_string()))
        .collect()
}

/// Text nodes before the first child element.
fn leading_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .map_while(|node| node.value().as_text().map(|text| text.to_string()))
        .collect()
}

fn child_elements(element: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap).collect()
}

fn descendant_ids(element: ElementRef<'_>) -> Vec<NodeId> {
    element.descendants().skip(1).map(|node| node.id()).collect()
}

fn has_descendant_named(element: ElementRef<'_>, name: &str) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|descendant| descendant.value().name() == name)
}

/// Ancestor tag names, outermost first.
fn ancestor_tags(element: ElementRef<'_>) -> Vec<String> {
    let mut tags: Vec<String> = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|ancestor| ancestor.value().name().to_string())
        .collect();
    tags.reverse();
    tags
}

fn list_depth(element: ElementRef<'_>) -> usize {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|ancestor| LIST_TAGS.contains(&ancestor.value().name()))
        .count()
}

fn is_structural(tag: &str) -> bool {
    SECTION_TAGS.contains(&tag) || tag == "body"
}

/// A bullet glyph with nothing after it.
fn is_bullet_marker(text: &str) -> bool {
    is_bulleted_text(text) && clean_bullets(text).is_empty()
}

/// `<div><span>●</span><span>text</span></div>`
fn has_adjacent_bulleted_spans(tag: &str, children: &[ElementRef<'_>]) -> bool {
    if !SECTION_TAGS.contains(&tag) || children.len() < 2 {
        return false;
    }
    children
        .iter()
        .all(|child| child.value().name() == "span")
        && is_bulleted_text(&normalize_text(&element_text(children[0])))
}

fn is_text_leaf(element: ElementRef<'_>, options: &HtmlOptions) -> bool {
    let children = child_elements(element);
    if children.len() > options.max_predecessor_len + 5 {
        return false;
    }
    let tag = element.value().name();
    let candidate = TEXT_TAGS.contains(&tag)
        || HEADING_TAGS.contains(&tag)
        || TEXTBREAK_TAGS.contains(&tag)
        || (is_structural(tag) && children.is_empty())
        || has_adjacent_bulleted_spans(tag, &children);
    if !candidate || has_descendant_named(element, "table") {
        return false;
    }
    // A bare glyph marks the next sibling as a list item.
    !is_bullet_marker(&normalize_text(&element_text(element)))
}

fn is_container_with_text(element: ElementRef<'_>) -> bool {
    is_structural(element.value().name())
        && element.children().any(|node| node.value().is_element())
        && !leading_text(element).trim().is_empty()
}

fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|row| row.value().name() == "tr")
        .collect()
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(|cell| normalize_text(&element_text(cell)))
        .collect()
}

fn row_text(row: ElementRef<'_>) -> String {
    row_cells(row)
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A table with at least one non-empty row where every non-empty row is
/// bulleted.
fn is_bulleted_table(element: ElementRef<'_>) -> bool {
    if element.value().name() != "table" {
        return false;
    }
    let mut any_bulleted = false;
    for row in table_rows(element) {
        let text = row_text(row);
        if text.is_empty() {
            continue;
        }
        if !is_bulleted_text(&text) {
            return false;
        }
        any_bulleted = true;
    }
    any_bulleted
}

fn is_table_leaf(element: ElementRef<'_>) -> bool {
    TABLE_TAGS.contains(&element.value().name()) && !has_descendant_named(element, "table")
}

/// Block-level children rule out reading a node as a single list item.
fn has_block_children(element: ElementRef<'_>) -> bool {
    element.children().filter_map(ElementRef::wrap).any(|child| {
        let name = child.value().name();
        SECTION_TAGS.contains(&name)
            || LIST_TAGS.contains(&name)
            || TABLE_TAGS.contains(&name)
            || HEADING_TAGS.contains(&name)
            || name == "p"
    })
}

fn is_list_item_node(element: ElementRef<'_>) -> bool {
    let tag = element.value().name();
    if LIST_ITEM_TAGS.contains(&tag) {
        return true;
    }
    if !(is_structural(tag) || TEXT_TAGS.contains(&tag)) || has_block_children(element) {
        return false;
    }
    is_bulleted_text(&normalize_text(&element_text(element)))
}

fn find_main(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "main")
        .unwrap_or(root)
}

/// Matching elements under `root` that have no matching ancestor below `root`.
fn outermost_matching<'a>(
    root: ElementRef<'a>,
    matches: impl Fn(&ElementRef<'a>) -> bool,
) -> Vec<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|element| matches(element))
        .filter(|element| {
            let nested = element
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root.id())
                .filter_map(ElementRef::wrap)
                .any(|ancestor| matches(&ancestor));
            if nested {
                log::debug!("skipping nested <{}>", element.value().name());
            }
            !nested
        })
        .collect()
}

fn find_articles(root: ElementRef<'_>, assemble_articles: bool) -> Vec<ElementRef<'_>> {
    if !assemble_articles {
        return vec![root];
    }
    let articles = outermost_matching(root, |element| element.value().name() == "article");
    if !articles.is_empty() {
        return articles;
    }
    let bodies = outermost_matching(root, |element| {
        element.value().name() == "div" && element.value().attr("itemprop") == Some("articleBody")
    });
    if !bodies.is_empty() {
        return bodies;
    }
    vec![root]
}

static DEFAULT_TABLE_RENDERER: HtmlTableRenderer = HtmlTableRenderer;

/// HTML partitioner
///
/// Holds the text classifier and table renderer used for every document.
#[derive(Clone, Copy)]
pub struct HtmlPartitioner<'a> {
    classifier: TextClassifier<'a>,
    renderer: &'a dyn TableRenderer,
}

impl std::fmt::Debug for HtmlPartitioner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPartitioner")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl Default for HtmlPartitioner<'static> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlPartitioner<'static> {
    /// Create a partitioner with the default NLP backend and HTML table
    /// renderer
    #[inline]
    #[must_use = "creates a partitioner that should be used for parsing"]
    pub fn new() -> Self {
        Self::with_classifier(TextClassifier::default())
    }
}

impl<'a> HtmlPartitioner<'a> {
    /// Create a partitioner with a custom classifier
    #[inline]
    #[must_use = "creates a partitioner that should be used for parsing"]
    pub fn with_classifier(classifier: TextClassifier<'a>) -> Self {
        Self {
            classifier,
            renderer: &DEFAULT_TABLE_RENDERER,
        }
    }

    /// Create a partitioner with a custom classifier and table renderer
    #[inline]
    #[must_use = "creates a partitioner that should be used for parsing"]
    pub const fn with_parts(
        classifier: TextClassifier<'a>,
        renderer: &'a dyn TableRenderer,
    ) -> Self {
        Self {
            classifier,
            renderer,
        }
    }

    /// Walk `html` into pages, without filtering or page numbers.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::MissingTagContext`] if an element cannot be
    /// given a tag context.
    pub fn parse_document(&self, html: &str, options: &HtmlOptions) -> Result<HtmlDocument> {
        let document = Html::parse_document(html);
        let root = find_main(&document);
        let mut pages = PageBuilder::default();
        for article in find_articles(root, options.assemble_articles) {
            self.walk_article(article, options, &mut pages)?;
            pages.flush();
        }
        Ok(pages.finish())
    }

    fn walk_article(
        &self,
        article: ElementRef<'_>,
        options: &HtmlOptions,
        pages: &mut PageBuilder,
    ) -> Result<()> {
        let mut consumed: HashSet<NodeId> = HashSet::new();

        for node in article.descendants() {
            if consumed.contains(&node.id()) {
                continue;
            }
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            let tag = element.value().name();

            if SKIPPED_TAGS.contains(&tag) {
                consumed.extend(descendant_ids(element));
            } else if is_text_leaf(element, options) {
                pages.extend(self.process_text_leaf(element)?);
                consumed.extend(descendant_ids(element));
            } else if is_container_with_text(element) {
                let subtree = collect_text(
                    element,
                    CollectOptions {
                        split_at_breaks: false,
                        skip_nested_lists: false,
                        include_tail: false,
                    },
                );
                let mut run = TextRun {
                    text: leading_text(element),
                    ..TextRun::default()
                };
                for collected in subtree.runs {
                    run.links.extend(collected.links);
                    run.emphasized.extend(collected.emphasized);
                }
                let ancestors = ancestor_tags(element);
                if let Some(emitted) = self.text_to_element(&run, tag, &ancestors, None)? {
                    pages.push(emitted);
                }
            } else if is_bulleted_table(element) {
                pages.extend(self.bulleted_table_items(element)?);
                consumed.extend(descendant_ids(element));
            } else if is_list_item_node(element) {
                let (item, folded) = self.process_list_item(element, options)?;
                if let Some(item) = item {
                    pages.push(item);
                }
                consumed.extend(folded);
            } else if is_table_leaf(element) {
                if let Some(table) = self.process_table(element)? {
                    pages.push(table);
                }
                consumed.extend(descendant_ids(element));
            } else if PAGEBREAK_TAGS.contains(&tag) {
                pages.flush();
            }
        }
        Ok(())
    }

    fn process_text_leaf(&self, element: ElementRef<'_>) -> Result<Vec<Element>> {
        let tag = element.value().name();
        let ancestors = ancestor_tags(element);
        let collected = collect_text(
            element,
            CollectOptions {
                split_at_breaks: true,
                skip_nested_lists: false,
                include_tail: true,
            },
        );
        let mut emitted = Vec::new();
        for run in &collected.runs {
            if let Some(item) = self.text_to_element(run, tag, &ancestors, heading_depth(tag))? {
                emitted.push(item);
            }
        }
        Ok(emitted)
    }

    fn process_list_item(
        &self,
        element: ElementRef<'_>,
        options: &HtmlOptions,
    ) -> Result<(Option<Element>, Vec<NodeId>)> {
        let tag = element.value().name();

        if LIST_ITEM_TAGS.contains(&tag) {
            let collected = collect_text(
                element,
                CollectOptions {
                    split_at_breaks: false,
                    skip_nested_lists: true,
                    include_tail: true,
                },
            );
            let Some(run) = collected.runs.first() else {
                return Ok((None, collected.visited));
            };
            let text = normalize_text(&run.text);
            let text = if is_bulleted_text(&text) {
                clean_bullets(&text)
            } else {
                text
            };
            if text.is_empty() {
                return Ok((None, collected.visited));
            }
            let item = Self::build_element(
                ElementType::ListItem,
                text,
                tag,
                &ancestor_tags(element),
                Some(list_depth(element)),
                run,
            )?;
            return Ok((Some(item), collected.visited));
        }

        let whole = CollectOptions::default();
        let mut folded = descendant_ids(element);
        let own = collect_text(element, whole);
        if let Some(run) = own.runs.first() {
            let cleaned = clean_bullets(&normalize_text(&run.text));
            if !cleaned.is_empty() {
                let item = Self::build_element(
                    ElementType::ListItem,
                    cleaned,
                    tag,
                    &ancestor_tags(element),
                    None,
                    run,
                )?;
                return Ok((Some(item), folded));
            }
        }

        if folded.len() > options.max_predecessor_len {
            log::debug!("<{tag}> bullet marker has too many descendants to be a list marker");
            return Ok((None, Vec::new()));
        }
        let Some(next) = element.next_siblings().find_map(ElementRef::wrap) else {
            return Ok((None, Vec::new()));
        };
        let body = collect_text(next, whole);
        let Some(run) = body.runs.first() else {
            return Ok((None, Vec::new()));
        };
        let text = clean_bullets(&normalize_text(&run.text));
        if text.is_empty() {
            return Ok((None, Vec::new()));
        }
        let item = Self::build_element(
            ElementType::ListItem,
            text,
            next.value().name(),
            &ancestor_tags(next),
            None,
            run,
        )?;
        folded.push(next.id());
        folded.extend(descendant_ids(next));
        Ok((Some(item), folded))
    }

    fn bulleted_table_items(&self, table: ElementRef<'_>) -> Result<Vec<Element>> {
        let mut items = Vec::new();
        for row in table_rows(table) {
            let text = row_text(row);
            if !is_bulleted_text(&text) {
                continue;
            }
            let cleaned = clean_bullets(&text);
            if cleaned.is_empty() {
                continue;
            }
            items.push(Self::build_element(
                ElementType::ListItem,
                cleaned,
                "tr",
                &ancestor_tags(row),
                None,
                &TextRun::default(),
            )?);
        }
        Ok(items)
    }

    fn process_table(&self, element: ElementRef<'_>) -> Result<Option<Element>> {
        let tag = element.value().name();
        let grid = match tag {
            "tr" => vec![row_cells(element)],
            "td" | "th" => vec![vec![normalize_text(&element_text(element))]],
            _ => table_rows(element).into_iter().map(row_cells).collect(),
        };
        let text = table_text(&grid);
        if text.is_empty() {
            return Ok(None);
        }
        let html = self.renderer.render(&grid);
        let mut table = Self::build_element(
            ElementType::Table,
            text,
            tag,
            &ancestor_tags(element),
            None,
            &TextRun::default(),
        )?;
        table.metadata.text_as_html = Some(html);
        Ok(Some(table))
    }

    /// Classify extracted text.
    ///
    /// Bulleted text becomes a list item, then addresses and email addresses
    /// are recognized. Shorter than two characters is dropped. Heading tags
    /// are always titles; other tags are narrative if the text reads like
    /// prose, a title if it could be one, and plain text otherwise.
    fn text_to_element(
        &self,
        run: &TextRun,
        tag: &str,
        ancestors: &[String],
        depth: Option<usize>,
    ) -> Result<Option<Element>> {
        let text = normalize_text(&run.text);
        let (element_type, text) = if is_bulleted_text(&text) {
            let cleaned = clean_bullets(&text);
            if cleaned.is_empty() {
                return Ok(None);
            }
            (ElementType::ListItem, cleaned)
        } else if is_us_city_state_zip(&text) {
            (ElementType::Address, text)
        } else if is_email_address(&text) {
            (ElementType::EmailAddress, text)
        } else if text.chars().count() < 2 {
            if !text.is_empty() {
                log::debug!("dropping <{tag}> text too short to classify: {text:?}");
            }
            return Ok(None);
        } else if HEADING_TAGS.contains(&tag) {
            (ElementType::Title, text)
        } else if self
            .classifier
            .is_possible_narrative_text(&text, DEFAULT_CAP_THRESHOLD)
        {
            (ElementType::NarrativeText, text)
        } else if self
            .classifier
            .is_possible_title(&text, DEFAULT_SENTENCE_MIN_LENGTH)
        {
            (ElementType::Title, text)
        } else {
            (ElementType::Text, text)
        };

        Self::build_element(element_type, text, tag, ancestors, depth, run)
            .map(Some)
    }

    fn build_element(
        element_type: ElementType,
        text: String,
        tag: &str,
        ancestors: &[String],
        depth: Option<usize>,
        run: &TextRun,
    ) -> Result<Element> {
        let links: Vec<Link> = run
            .links
            .iter()
            .map(|(link_text, url)| {
                let link_text = normalize_text(link_text);
                Link {
                    start_index: char_offset(&text, &link_text),
                    text: link_text,
                    url: url.clone(),
                }
            })
            .collect();
        let emphasized: Vec<EmphasizedText> = run
            .emphasized
            .iter()
            .map(|(content, emphasis_tag)| EmphasizedText {
                text: normalize_text(content),
                tag: emphasis_tag.clone(),
            })
            .filter(|emphasis| !emphasis.text.is_empty())
            .collect();

        let mut metadata = ElementMetadata {
            category_depth: depth,
            ..ElementMetadata::default()
        };
        stamp_links(&mut metadata, &links);
        stamp_emphasis(&mut metadata, &emphasized);

        let context = TagContext::new(tag, ancestors.to_vec())?
            .with_links(links)
            .with_emphasized_texts(emphasized);
        Ok(Element::new(element_type, text)
            .with_metadata(metadata)
            .with_tag_context(context))
    }
}

impl Partitioner for HtmlPartitioner<'_> {
    type Options = HtmlOptions;

    fn input_kind(&self) -> InputKind {
        InputKind::Html
    }

    fn partition_str(&self, input: &str, options: &HtmlOptions) -> Result<Vec<Element>> {
        let mut document = self.parse_document(input, options)?;
        document.apply_cleaners(options.skip_headers_and_footers, options.skip_table_text)?;
        let elements = document.into_elements(options);
        log::debug!("partitioned HTML into {} elements", elements.len());
        Ok(elements)
    }
}

/// Partition an HTML document with the default partitioner.
///
/// # Errors
///
/// Returns an error if an element cannot be given a tag context.
///
/// # Examples
///
/// ```
/// use docpart_backend::html::partition_html;
/// use docpart_backend::HtmlOptions;
/// use docpart_core::ElementType;
///
/// let html = "<html><body><h1>Quarterly Report</h1>\
///             <p>Revenue increased by ten percent during the quarter.</p></body></html>";
/// let elements = partition_html(html, &HtmlOptions::default())?;
/// assert_eq!(elements[0].element_type, ElementType::Title);
/// assert_eq!(elements[1].element_type, ElementType::NarrativeText);
/// assert_eq!(elements[1].metadata.page_number, Some(1));
/// # Ok::<(), docpart_core::DocpartError>(())
/// ```
pub fn partition_html(html: &str, options: &HtmlOptions) -> Result<Vec<Element>> {
    HtmlPartitioner::new().partition_str(html, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(html: &str) -> Vec<Element> {
        partition_html(html, &HtmlOptions::default()).expect("partitioning should succeed")
    }

    fn summary(elements: &[Element]) -> Vec<(ElementType, &str)> {
        elements
            .iter()
            .map(|element| (element.element_type, element.text.as_str()))
            .collect()
    }

    #[test]
    fn test_partitioner_input_kind() {
        let partitioner = HtmlPartitioner::new();
        assert_eq!(partitioner.input_kind(), InputKind::Html);
        assert!(partitioner.can_handle(InputKind::Html));
        assert!(!partitioner.can_handle(InputKind::Text));
    }

    #[test]
    fn test_partition_bytes_invalid_utf8() {
        let result = HtmlPartitioner::new().partition_bytes(&[0xFF, 0xFE, 0xFD], &HtmlOptions::default());
        match result {
            Err(DocpartError::InvalidInput(message)) => assert!(message.contains("Invalid UTF-8")),
            other => panic!("Expected InvalidInput for invalid UTF-8, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_document() {
        assert!(partition("<html><body></body></html>").is_empty());
        assert!(partition("").is_empty());
    }

    #[test]
    fn test_heading_is_title_with_depth() {
        let elements = partition("<h1>Overview</h1><h3>Details</h3>");
        assert_eq!(
            summary(&elements),
            vec![(ElementType::Title, "Overview"), (ElementType::Title, "Details")]
        );
        assert_eq!(elements[0].metadata.category_depth, Some(0));
        assert_eq!(elements[1].metadata.category_depth, Some(2));
    }

    #[test]
    fn test_heading_wins_over_narrative() {
        let elements = partition("<h2>The committee approved the budget on Tuesday.</h2>");
        assert_eq!(elements[0].element_type, ElementType::Title);
    }

    #[test]
    fn test_paragraph_is_narrative() {
        let elements = partition("<p>The committee approved the budget on Tuesday.</p>");
        assert_eq!(
            summary(&elements),
            vec![(ElementType::NarrativeText, "The committee approved the budget on Tuesday.")]
        );
        let context = elements[0].tag_context.as_ref().expect("html elements carry tag context");
        assert_eq!(context.tag, "p");
        assert_eq!(context.ancestor_tags, vec!["html", "body"]);
    }

    #[test]
    fn test_short_text_dropped() {
        assert!(partition("<p>a</p>").is_empty());
    }

    #[test]
    fn test_address_and_email() {
        let elements = partition("<p>Doylestown, PA 18901</p><p>jane.doe@example.com</p>");
        assert_eq!(
            summary(&elements),
            vec![
                (ElementType::Address, "Doylestown, PA 18901"),
                (ElementType::EmailAddress, "jane.doe@example.com"),
            ]
        );
    }

    #[test]
    fn test_bulleted_paragraph_is_list_item() {
        let elements = partition("<p>● Fresh apples</p>");
        assert_eq!(summary(&elements), vec![(ElementType::ListItem, "Fresh apples")]);
    }

    #[test]
    fn test_native_list_items_with_depth() {
        let elements = partition(
            "<ul><li>Fruit<ul><li>Apples</li><li>Pears</li></ul></li><li>Bread</li></ul>",
        );
        assert_eq!(
            summary(&elements),
            vec![
                (ElementType::ListItem, "Fruit"),
                (ElementType::ListItem, "Apples"),
                (ElementType::ListItem, "Pears"),
                (ElementType::ListItem, "Bread"),
            ]
        );
        let depths: Vec<_> = elements.iter().map(|e| e.metadata.category_depth).collect();
        assert_eq!(depths, vec![Some(1), Some(2), Some(2), Some(1)]);
    }

    #[test]
    fn test_bullet_marker_looks_ahead_to_next_sibling() {
        let elements = partition("<div><p>●</p><p>Fresh apples</p><p>●</p><p>Ripe pears</p></div>");
        assert_eq!(
            summary(&elements),
            vec![
                (ElementType::ListItem, "Fresh apples"),
                (ElementType::ListItem, "Ripe pears"),
            ]
        );
    }

    #[test]
    fn test_bullet_marker_without_sibling_emits_nothing() {
        assert!(partition("<div><p>●</p></div>").is_empty());
    }

    #[test]
    fn test_bullet_marker_breadth_guard_emits_nothing() {
        let crowded = format!(
            "<div><p>•{}</p><p>Body text here</p></div>",
            "<i></i>".repeat(20)
        );
        let elements = partition(&crowded);
        assert!(
            elements.iter().all(|e| e.element_type != ElementType::ListItem),
            "a marker with 21 descendants does not start a list item: {:?}",
            summary(&elements)
        );
        assert!(
            elements.iter().any(|e| e.text == "Body text here"),
            "the following paragraph is still emitted on its own"
        );

        let bare = partition("<div><p>•</p><p>Body text here</p></div>");
        assert_eq!(summary(&bare), vec![(ElementType::ListItem, "Body text here")]);
    }

    #[test]
    fn test_bullet_marker_breadth_guard_boundary() {
        // The glyph's text node plus the <i> elements are the marker's descendants.
        let marker = |children: usize| {
            format!(
                "<div><p>•{}</p><p>Body text here</p></div>",
                "<i></i>".repeat(children)
            )
        };
        let at_limit = partition(&marker(crate::traits::DEFAULT_MAX_PREDECESSOR_LEN - 1));
        assert_eq!(
            summary(&at_limit),
            vec![(ElementType::ListItem, "Body text here")],
            "exactly max_predecessor_len descendants still looks ahead"
        );
        let over_limit = partition(&marker(crate::traits::DEFAULT_MAX_PREDECESSOR_LEN));
        assert!(
            over_limit.iter().all(|e| e.element_type != ElementType::ListItem),
            "one descendant past the limit does not look ahead"
        );

        let options = HtmlOptions::default().with_max_predecessor_len(3);
        let widened = partition_html(&marker(2), &options).unwrap();
        assert_eq!(summary(&widened), vec![(ElementType::ListItem, "Body text here")]);
        let narrowed = partition_html(&marker(3), &options).unwrap();
        assert!(narrowed.iter().all(|e| e.element_type != ElementType::ListItem));
    }

    #[test]
    fn test_list_item_outside_list_has_depth_zero() {
        let elements = partition("<body><li>Loose item</li></body>");
        assert_eq!(summary(&elements), vec![(ElementType::ListItem, "Loose item")]);
        assert_eq!(elements[0].metadata.category_depth, Some(0));
    }

    #[test]
    fn test_bulleted_spans() {
        let elements = partition("<div><span>●</span><span>First point</span></div>");
        assert_eq!(summary(&elements), vec![(ElementType::ListItem, "First point")]);
    }

    #[test]
    fn test_break_tags_unfurl_into_lines() {
        let elements = partition("<p>Quarterly Results<br>The committee approved the budget on Tuesday.</p>");
        assert_eq!(
            summary(&elements),
            vec![
                (ElementType::Title, "Quarterly Results"),
                (ElementType::NarrativeText, "The committee approved the budget on Tuesday."),
            ]
        );
    }

    #[test]
    fn test_container_with_leading_text() {
        let elements = partition(
            "<div>The committee approved the budget on Tuesday.<p>The vote was unanimous and took an hour.</p></div>",
        );
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text, "The committee approved the budget on Tuesday.");
        assert_eq!(elements[1].text, "The vote was unanimous and took an hour.");
    }

    #[test]
    fn test_container_carries_links_and_emphasis() {
        let elements = partition(
            "<div>The committee approved the budget on Tuesday.<a href=\"https://example.com/minutes\">minutes</a><b>Important</b></div>",
        );
        let container = &elements[0];
        assert_eq!(container.text, "The committee approved the budget on Tuesday.");
        assert_eq!(container.metadata.link_urls, vec!["https://example.com/minutes"]);
        assert_eq!(container.metadata.link_texts, vec!["minutes"]);
        assert_eq!(
            container.metadata.link_start_indexes,
            vec![-1],
            "the link text lies outside the leading text"
        );
        assert_eq!(container.metadata.emphasized_text_contents, vec!["Important"]);
        assert_eq!(container.metadata.emphasized_text_tags, vec!["b"]);
        let context = container.tag_context.as_ref().expect("container has a tag context");
        assert_eq!(context.links.len(), 1);
        assert_eq!(context.emphasized_texts.len(), 1);
    }

    #[test]
    fn test_table_element() {
        let elements = partition(
            "<table><tr><th>Item</th><th>Qty</th></tr><tr><td>Apples</td><td>3</td></tr></table>",
        );
        assert_eq!(summary(&elements), vec![(ElementType::Table, "Item Qty Apples 3")]);
        assert_eq!(
            elements[0].metadata.text_as_html.as_deref(),
            Some("<table><tr><td>Item</td><td>Qty</td></tr><tr><td>Apples</td><td>3</td></tr></table>")
        );
    }

    #[test]
    fn test_bulleted_table_rows_become_list_items() {
        let elements = partition("<table><tr><td>● Apples</td></tr><tr><td>● Pears</td></tr></table>");
        assert_eq!(
            summary(&elements),
            vec![(ElementType::ListItem, "Apples"), (ElementType::ListItem, "Pears")]
        );
    }

    #[test]
    fn test_links_and_emphasis() {
        let elements = partition(
            "<p>Read <b>the</b> <a href=\"https://example.com/docs\">full documentation</a> before you start.</p>",
        );
        let metadata = &elements[0].metadata;
        assert_eq!(metadata.link_urls, vec!["https://example.com/docs"]);
        assert_eq!(metadata.link_texts, vec!["full documentation"]);
        assert_eq!(metadata.link_start_indexes, vec![9]);
        assert_eq!(metadata.emphasized_text_contents, vec!["the"]);
        assert_eq!(metadata.emphasized_text_tags, vec!["b"]);
    }

    #[test]
    fn test_scripts_and_styles_ignored() {
        let elements = partition(
            "<body><script>var x = 'The committee approved it';</script><style>p { color: red; }</style><p>The committee approved the budget.</p></body>",
        );
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text, "The committee approved the budget.");
    }

    #[test]
    fn test_main_is_root() {
        let elements = partition("<body><h1>Outside</h1><main><h1>Inside</h1></main></body>");
        assert_eq!(summary(&elements), vec![(ElementType::Title, "Inside")]);
    }

    #[test]
    fn test_articles_become_pages() {
        let elements = partition(
            "<body><article><h1>First</h1></article><article><h1>Second</h1><article><h2>Inner</h2></article></article></body>",
        );
        let pages: Vec<_> = elements.iter().map(|e| (e.text.as_str(), e.metadata.page_number)).collect();
        assert_eq!(pages, vec![("First", Some(1)), ("Second", Some(2)), ("Inner", Some(2))]);
    }

    #[test]
    fn test_item_prop_article_body_is_the_article() {
        let elements = partition(
            "<body><p>Outside the article body.</p><div itemprop=\"articleBody\"><p>The body of the article is here.</p></div></body>",
        );
        assert_eq!(
            summary(&elements),
            vec![(ElementType::NarrativeText, "The body of the article is here.")]
        );
        assert_eq!(elements[0].metadata.page_number, Some(1));

        let options = HtmlOptions::default().with_assemble_articles(false);
        let everything = partition_html(
            "<body><p>Outside the article body.</p><div itemprop=\"articleBody\"><p>The body of the article is here.</p></div></body>",
            &options,
        )
        .unwrap();
        assert_eq!(everything.len(), 2, "without assembly the whole body is read");
    }

    #[test]
    fn test_articles_not_assembled() {
        let options = HtmlOptions::default().with_assemble_articles(false);
        let elements = partition_html(
            "<body><article><h1>First</h1></article><article><h1>Second</h1></article></body>",
            &options,
        )
        .unwrap();
        assert!(elements.iter().all(|e| e.metadata.page_number == Some(1)));
    }

    #[test]
    fn test_page_breaks() {
        let html = "<h1>One</h1><hr><hr><h1>Two</h1>";
        let elements = partition(html);
        assert_eq!(elements[1].metadata.page_number, Some(2), "consecutive <hr> do not create empty pages");

        let options = HtmlOptions::default().with_page_breaks(true);
        let elements = partition_html(html, &options).unwrap();
        assert_eq!(
            elements.iter().map(|e| e.element_type).collect::<Vec<_>>(),
            vec![ElementType::Title, ElementType::PageBreak, ElementType::Title]
        );
    }

    #[test]
    fn test_source_fields_stamped() {
        let options = HtmlOptions::default()
            .with_filename("index.html")
            .with_url("https://example.com/index.html");
        let elements = partition_html("<h1>Welcome</h1>", &options).unwrap();
        assert_eq!(elements[0].metadata.filename.as_deref(), Some("index.html"));
        assert_eq!(
            elements[0].metadata.url.as_deref(),
            Some("https://example.com/index.html")
        );
    }

    #[test]
    fn test_cleaners_require_tag_context() {
        let document = HtmlDocument {
            pages: vec![HtmlPage {
                number: 0,
                elements: vec![Element::title("Loose")],
            }],
        };
        let result = document.doc_after_cleaners(true, true);
        assert!(matches!(result, Err(DocpartError::MissingTagContext(_))));
    }

    #[test]
    fn test_cleaners_copy_and_in_place_agree() {
        let html = "<header><h1>Site</h1></header><h1>Body</h1><table><tr><td>x y</td></tr></table>";
        let partitioner = HtmlPartitioner::new();
        let mut document = partitioner.parse_document(html, &HtmlOptions::default()).unwrap();
        let copy = document.doc_after_cleaners(true, true).unwrap();
        assert_eq!(document.elements().count(), 3, "the copy leaves the original untouched");
        document.apply_cleaners(true, true).unwrap();
        assert_eq!(document, copy);
        assert_eq!(
            document.elements().map(|e| e.text.as_str()).collect::<Vec<_>>(),
            vec!["Body"]
        );
    }

    #[test]
    fn test_footer_cuts_rest_of_page() {
        let options = HtmlOptions::default().with_skip_headers_and_footers(true);
        let elements = partition_html(
            "<h1>Body</h1><footer><p>Copyright notice</p></footer><h2>After the footer</h2>",
            &options,
        )
        .unwrap();
        assert_eq!(summary(&elements), vec![(ElementType::Title, "Body")]);
    }
}
