//! Layout/OCR normalizer
//!
//! Layout detectors and OCR engines emit flat records: a type label, the
//! recognized text, an optional box and a confidence score. Each label set
//! differs slightly between detector families, so labels go through a closed
//! match table and anything unrecognized becomes uncategorized text.

use crate::traits::{InputKind, LayoutOptions, Partitioner};
use docpart_core::classify::split_list_items;
use docpart_core::{Element, ElementMetadata, ElementType, Point, Result};
use serde::{Deserialize, Serialize};

/// One record produced by an external layout detector.
///
/// Unknown keys in the source JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Detector label, e.g. `"Title"`, `"List"`, `"Page-header"`
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Point>>,
    /// Producer tag, copied into `metadata.detection_origin`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Detector confidence, copied into `metadata.detection_class_prob`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prob: Option<f64>,
}

impl LayoutElement {
    #[inline]
    #[must_use = "creates a layout element"]
    pub fn new(element_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use = "returns the layout element with a box attached"]
    pub fn with_coordinates(mut self, coordinates: Vec<Point>) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    #[inline]
    #[must_use = "returns the layout element with a producer tag attached"]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[inline]
    #[must_use = "returns the layout element with a confidence attached"]
    pub const fn with_prob(mut self, prob: f64) -> Self {
        self.prob = Some(prob);
        self
    }
}

/// Result of looking a detector label up in the match table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelMapping {
    /// One element of this type, with an optional category depth
    Single(ElementType, Option<usize>),
    /// A list block, split into items when list inference is on
    List,
}

fn map_label(label: &str) -> LabelMapping {
    use LabelMapping::{List, Single};

    match label.trim().to_lowercase().as_str() {
        "title" | "section-header" | "field-name" => Single(ElementType::Title, None),
        "headline" => Single(ElementType::Title, Some(1)),
        "subheadline" | "sub-headline" => Single(ElementType::Title, Some(2)),
        "text" | "narrativetext" | "abstract" | "paragraph" | "value" | "threading" => {
            Single(ElementType::NarrativeText, None)
        }
        "uncategorizedtext" | "othertext" => Single(ElementType::Text, None),
        "figure" | "figurecaption" | "caption" => Single(ElementType::FigureCaption, None),
        "listitem" | "list-item" | "bulletedtext" => Single(ElementType::ListItem, None),
        "list" => List,
        "checked" | "checkbox-checked" | "radio-button-checked" => {
            Single(ElementType::CheckBox { checked: true }, None)
        }
        "unchecked" | "checkbox-unchecked" | "radio-button-unchecked" | "checkbox"
        | "radio-button" => Single(ElementType::CheckBox { checked: false }, None),
        "header" | "page-header" => Single(ElementType::Header, None),
        "footer" | "page-footer" | "footnote" => Single(ElementType::Footer, None),
        "formula" => Single(ElementType::Formula, None),
        "table" => Single(ElementType::Table, None),
        "image" | "picture" => Single(ElementType::Image, None),
        "address" => Single(ElementType::Address, None),
        "emailaddress" | "email-address" => Single(ElementType::EmailAddress, None),
        "pagebreak" | "page-break" => Single(ElementType::PageBreak, None),
        _ => {
            log::warn!("unknown layout label '{label}', using UncategorizedText");
            Single(ElementType::Text, None)
        }
    }
}

/// Metadata shared by every element produced from one record.
fn layout_metadata(layout: &LayoutElement, options: &LayoutOptions) -> Result<ElementMetadata> {
    let system = layout.coordinates.as_ref().and(options.coordinate_system);
    let mut metadata =
        ElementMetadata::default().with_coordinates(layout.coordinates.clone(), system)?;
    metadata.detection_class_prob = layout.prob.filter(|prob| prob.is_finite());
    if metadata.detection_class_prob.is_none() && layout.prob.is_some() {
        log::debug!("dropping non-finite detection probability for '{}'", layout.text);
    }
    metadata.detection_origin.clone_from(&layout.source);
    Ok(metadata)
}

/// Normalize one detector record.
///
/// Returns more than one element only for `List` records with
/// `infer_list_items` enabled; every item keeps the record's box.
///
/// # Errors
/// Returns [`docpart_core::DocpartError::CoordinateMismatch`] if the record
/// has a box but `options` names no coordinate system.
pub fn normalize_layout_element(
    layout: &LayoutElement,
    options: &LayoutOptions,
) -> Result<Vec<Element>> {
    let metadata = layout_metadata(layout, options)?;

    match map_label(&layout.element_type) {
        LabelMapping::List if options.infer_list_items => {
            let items = split_list_items(&layout.text);
            log::debug!("split list block into {} items", items.len());
            Ok(items
                .into_iter()
                .map(|item| Element::list_item(item).with_metadata(metadata.clone()))
                .collect())
        }
        LabelMapping::List => Ok(vec![
            Element::list_item(layout.text.trim()).with_metadata(metadata)
        ]),
        LabelMapping::Single(element_type @ ElementType::CheckBox { .. }, _) => {
            Ok(vec![Element::new(element_type, "").with_metadata(metadata)])
        }
        LabelMapping::Single(element_type, depth) => {
            let mut metadata = metadata;
            metadata.category_depth = depth;
            Ok(vec![Element::new(element_type, layout.text.trim()).with_metadata(metadata)])
        }
    }
}

/// Normalize a sequence of detector records, preserving order.
///
/// # Errors
/// Returns the first error from [`normalize_layout_element`].
pub fn normalize_layout_elements(
    layouts: &[LayoutElement],
    options: &LayoutOptions,
) -> Result<Vec<Element>> {
    let mut elements = Vec::with_capacity(layouts.len());
    for layout in layouts {
        elements.extend(normalize_layout_element(layout, options)?);
    }
    Ok(elements)
}

/// Partitioner over a JSON array of [`LayoutElement`] records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutNormalizer;

impl LayoutNormalizer {
    #[inline]
    #[must_use = "creates a layout normalizer"]
    pub const fn new() -> Self {
        Self
    }
}

impl Partitioner for LayoutNormalizer {
    type Options = LayoutOptions;

    #[inline]
    fn input_kind(&self) -> InputKind {
        InputKind::LayoutJson
    }

    fn partition_str(&self, input: &str, options: &LayoutOptions) -> Result<Vec<Element>> {
        let layouts: Vec<LayoutElement> = serde_json::from_str(input)?;
        normalize_layout_elements(&layouts, options)
    }
}
