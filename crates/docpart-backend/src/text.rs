//! Plain-text partitioner
//!
//! Cuts text into paragraphs and classifies each with the same rules the HTML
//! partitioner applies to text blocks. Plain text has no pagination, so every
//! element lands on page 1.

use crate::traits::{InputKind, ParagraphSplit, Partitioner, TextOptions};
use crate::utils::normalize_text;
use docpart_core::classify::{
    is_bulleted_text, is_email_address, is_possible_numbered_list, is_us_city_state_zip,
    TextClassifier, DEFAULT_CAP_THRESHOLD, DEFAULT_SENTENCE_MIN_LENGTH,
};
use docpart_core::cleaners::clean_bullets;
use docpart_core::patterns::{NUMBERED_LIST, PARAGRAPH_BREAK};
use docpart_core::{Element, ElementMetadata, ElementType, Result};

/// Partitioner for plain text documents
#[derive(Debug, Clone, Copy)]
pub struct TextPartitioner<'a> {
    classifier: TextClassifier<'a>,
}

impl Default for TextPartitioner<'static> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TextPartitioner<'static> {
    /// Create a partitioner with the default NLP backend
    #[inline]
    #[must_use = "creates a partitioner that should be used for parsing"]
    pub fn new() -> Self {
        Self::with_classifier(TextClassifier::default())
    }
}

impl<'a> TextPartitioner<'a> {
    /// Create a partitioner with a custom classifier
    #[inline]
    #[must_use = "creates a partitioner that should be used for parsing"]
    pub const fn with_classifier(classifier: TextClassifier<'a>) -> Self {
        Self { classifier }
    }

    fn paragraphs<'t>(text: &'t str, split: ParagraphSplit) -> Vec<&'t str> {
        match split {
            ParagraphSplit::BlankLine => PARAGRAPH_BREAK.split(text).collect(),
            ParagraphSplit::Line => text.lines().collect(),
        }
    }

    fn classify(&self, paragraph: &str) -> Option<Element> {
        let text = normalize_text(paragraph);
        if text.is_empty() {
            return None;
        }

        let (element_type, text) = if is_bulleted_text(&text) {
            let cleaned = clean_bullets(&text);
            if cleaned.is_empty() {
                return None;
            }
            (ElementType::ListItem, cleaned)
        } else if is_us_city_state_zip(&text) {
            (ElementType::Address, text)
        } else if is_email_address(&text) {
            (ElementType::EmailAddress, text)
        } else if is_possible_numbered_list(&text) {
            let item = NUMBERED_LIST
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map_or_else(|| text.clone(), |m| m.as_str().trim().to_string());
            (ElementType::ListItem, item)
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
        Some(Element::new(element_type, text))
    }
}

impl Partitioner for TextPartitioner<'_> {
    type Options = TextOptions;

    #[inline]
    fn input_kind(&self) -> InputKind {
        InputKind::Text
    }

    fn partition_str(&self, input: &str, options: &TextOptions) -> Result<Vec<Element>> {
        let mut metadata = ElementMetadata::default().with_page_number(1);
        metadata.filename.clone_from(&options.metadata_filename);

        let elements: Vec<Element> = Self::paragraphs(input, options.paragraph_split)
            .into_iter()
            .filter_map(|paragraph| self.classify(paragraph))
            .map(|element| element.with_metadata(metadata.clone()))
            .collect();
        log::debug!("partitioned plain text into {} elements", elements.len());
        Ok(elements)
    }
}

/// Partition plain text with the default classifier.
///
/// # Examples
///
/// ```
/// use docpart_backend::{partition_text, TextOptions};
/// use docpart_core::ElementType;
///
/// let text = "INTRODUCTION\n\nThe committee approved the budget on Tuesday.";
/// let elements = partition_text(text, &TextOptions::default())?;
/// assert_eq!(elements[0].element_type, ElementType::Title);
/// assert_eq!(elements[1].element_type, ElementType::NarrativeText);
/// # Ok::<(), docpart_core::DocpartError>(())
/// ```
///
/// # Errors
/// Never fails today; the `Result` matches the other partitioners.
pub fn partition_text(text: &str, options: &TextOptions) -> Result<Vec<Element>> {
    TextPartitioner::new().partition_str(text, options)
}
