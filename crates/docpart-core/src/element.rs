//! The canonical element model
//!
//! An [`Element`] is one typed unit of document content: a title, a paragraph
//! of narrative text, a list item, a table and so on. Every producer (HTML
//! partitioner, plain-text partitioner, layout normalizer) emits the same
//! model, and the serialization layer exchanges it as flat records.

use crate::coordinates::{CoordinateSystem, Point};
use crate::error::{DocpartError, Result};
use crate::metadata::{CoordinatesMetadata, ElementMetadata};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::borrow::Cow;

/// Number of hex characters kept from the SHA-256 digest of the text.
pub const CONTENT_HASH_ID_LEN: usize = 32;

/// Deterministic id of a piece of text: the first 32 hex characters of its
/// SHA-256 digest.
///
/// # Examples
///
/// ```
/// use docpart_core::element::content_hash_id;
///
/// let id = content_hash_id("Hello");
/// assert_eq!(id.len(), 32);
/// assert_eq!(id, content_hash_id("Hello"));
/// ```
#[must_use = "returns the content hash id"]
pub fn content_hash_id(text: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
    digest[..CONTENT_HASH_ID_LEN].to_string()
}

/// Variant of an element.
///
/// The set is closed. Labels that do not name a variant map to [`ElementType::Text`]
/// through [`ElementType::from_label`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    Title,
    NarrativeText,
    ListItem,
    /// Fallback for text that fits no other variant (`"UncategorizedText"`)
    #[default]
    Text,
    Address,
    EmailAddress,
    Table,
    CheckBox {
        checked: bool,
    },
    Image,
    FigureCaption,
    Header,
    Footer,
    Formula,
    PageBreak,
}

impl ElementType {
    /// Serialized type string of the variant.
    #[inline]
    #[must_use = "returns the type string of the element"]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::NarrativeText => "NarrativeText",
            Self::ListItem => "ListItem",
            Self::Text => "UncategorizedText",
            Self::Address => "Address",
            Self::EmailAddress => "EmailAddress",
            Self::Table => "Table",
            Self::CheckBox { .. } => "CheckBox",
            Self::Image => "Image",
            Self::FigureCaption => "FigureCaption",
            Self::Header => "Header",
            Self::Footer => "Footer",
            Self::Formula => "Formula",
            Self::PageBreak => "PageBreak",
        }
    }

    /// Parses a type string, falling back to [`ElementType::Text`] for labels
    /// outside the closed set.
    #[must_use = "returns the parsed element type"]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            log::warn!("unknown element type '{label}', using UncategorizedText");
            Self::Text
        })
    }

    /// The `checked` flag of a checkbox, `None` for every other variant.
    #[inline]
    #[must_use = "returns the checked state if this is a checkbox"]
    pub const fn checked(self) -> Option<bool> {
        match self {
            Self::CheckBox { checked } => Some(checked),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Title" => Ok(Self::Title),
            "NarrativeText" => Ok(Self::NarrativeText),
            "ListItem" => Ok(Self::ListItem),
            "UncategorizedText" | "Text" => Ok(Self::Text),
            "Address" => Ok(Self::Address),
            "EmailAddress" => Ok(Self::EmailAddress),
            "Table" => Ok(Self::Table),
            "CheckBox" => Ok(Self::CheckBox { checked: false }),
            "Image" => Ok(Self::Image),
            "FigureCaption" => Ok(Self::FigureCaption),
            "Header" => Ok(Self::Header),
            "Footer" => Ok(Self::Footer),
            "Formula" => Ok(Self::Formula),
            "PageBreak" => Ok(Self::PageBreak),
            _ => Err(format!("unknown element type: '{s}'")),
        }
    }
}

/// How an element without an explicit id gets one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IdMode {
    /// [`content_hash_id`] of the text; identical text gives identical ids
    #[default]
    ContentHash,
    /// A fresh UUID v4 per element
    Random,
}

/// A hyperlink found inside an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
    /// Offset of `text` inside the element text, `-1` when not found
    pub start_index: i64,
}

/// A run of emphasized text and the tag that emphasized it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasizedText {
    pub text: String,
    pub tag: String,
}

/// Markup context captured when an element is produced from a tag tree.
///
/// Only the tag names are kept; the element holds no reference into the
/// source document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagContext {
    pub tag: String,
    /// Ancestor tag names, outermost first
    pub ancestor_tags: Vec<String>,
    pub links: Vec<Link>,
    pub emphasized_texts: Vec<EmphasizedText>,
}

impl TagContext {
    /// Creates a tag context for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::MissingTagContext`] if `tag` is empty.
    pub fn new(tag: impl Into<String>, ancestor_tags: Vec<String>) -> Result<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(DocpartError::MissingTagContext(
                "a tag context needs a tag name".to_string(),
            ));
        }
        Ok(Self {
            tag,
            ancestor_tags,
            links: Vec::new(),
            emphasized_texts: Vec::new(),
        })
    }

    #[inline]
    #[must_use = "returns the tag context with links set"]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    #[inline]
    #[must_use = "returns the tag context with emphasized texts set"]
    pub fn with_emphasized_texts(mut self, emphasized_texts: Vec<EmphasizedText>) -> Self {
        self.emphasized_texts = emphasized_texts;
        self
    }

    /// True if the tag itself or any ancestor is one of `tags`.
    #[must_use = "returns whether the tag or an ancestor matches"]
    pub fn has_tag_or_ancestor_in(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag.as_str())
            || self
                .ancestor_tags
                .iter()
                .any(|ancestor| tags.contains(&ancestor.as_str()))
    }
}

/// A text-cleaning step usable with [`Element::apply`].
///
/// Plain `Fn(&str) -> String` functions and closures implement this trait
/// directly. Wrap a transform that may fail in [`FallibleTransform`].
pub trait TextTransform {
    /// Returns the transformed text, or `None` if the transform produced no
    /// string.
    fn transform(&self, text: &str) -> Option<String>;
}

impl<F> TextTransform for F
where
    F: Fn(&str) -> String,
{
    #[inline]
    fn transform(&self, text: &str) -> Option<String> {
        Some(self(text))
    }
}

/// Adapts a transform that may produce no output.
pub struct FallibleTransform<F>(pub F);

impl<F> TextTransform for FallibleTransform<F>
where
    F: Fn(&str) -> Option<String>,
{
    #[inline]
    fn transform(&self, text: &str) -> Option<String> {
        (self.0)(text)
    }
}

/// A typed, classified unit of document content.
///
/// Equality is structural over variant, text and metadata. The id and the
/// tag context do not take part.
#[derive(Debug, Clone)]
pub struct Element {
    element_id: Option<String>,
    pub element_type: ElementType,
    pub text: String,
    pub metadata: ElementMetadata,
    /// Present on elements produced by the HTML partitioner
    pub tag_context: Option<TagContext>,
}

impl Element {
    /// Creates an element with empty metadata and a content-hash id.
    #[must_use = "creates a new element"]
    pub fn new(element_type: ElementType, text: impl Into<String>) -> Self {
        Self {
            element_id: None,
            element_type,
            text: text.into(),
            metadata: ElementMetadata::default(),
            tag_context: None,
        }
    }

    /// Creates an element from optional parts.
    ///
    /// `coordinates` and `coordinate_system` override any coordinates already
    /// in `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::CoordinateMismatch`] if exactly one of
    /// `coordinates` and `coordinate_system` is supplied.
    pub fn try_new(
        element_type: ElementType,
        text: impl Into<String>,
        coordinates: Option<Vec<Point>>,
        coordinate_system: Option<CoordinateSystem>,
        metadata: Option<ElementMetadata>,
        element_id: Option<String>,
    ) -> Result<Self> {
        let mut metadata = metadata.unwrap_or_default();
        if let Some(spatial) = CoordinatesMetadata::from_parts(coordinates, coordinate_system)? {
            metadata.coordinates = Some(spatial);
        }
        Ok(Self {
            element_id,
            element_type,
            text: text.into(),
            metadata,
            tag_context: None,
        })
    }

    #[must_use = "creates a new title element"]
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(ElementType::Title, text)
    }

    #[must_use = "creates a new narrative text element"]
    pub fn narrative_text(text: impl Into<String>) -> Self {
        Self::new(ElementType::NarrativeText, text)
    }

    #[must_use = "creates a new list item element"]
    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(ElementType::ListItem, text)
    }

    #[must_use = "creates a new uncategorized text element"]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementType::Text, text)
    }

    #[must_use = "creates a new address element"]
    pub fn address(text: impl Into<String>) -> Self {
        Self::new(ElementType::Address, text)
    }

    #[must_use = "creates a new email address element"]
    pub fn email_address(text: impl Into<String>) -> Self {
        Self::new(ElementType::EmailAddress, text)
    }

    /// Creates a table element; `text_as_html` is stored in the metadata.
    #[must_use = "creates a new table element"]
    pub fn table(text: impl Into<String>, text_as_html: Option<String>) -> Self {
        let mut element = Self::new(ElementType::Table, text);
        element.metadata.text_as_html = text_as_html;
        element
    }

    /// Creates a checkbox element. Checkboxes carry no text.
    #[must_use = "creates a new checkbox element"]
    pub fn checkbox(checked: bool) -> Self {
        Self::new(ElementType::CheckBox { checked }, "")
    }

    #[must_use = "creates a new image element"]
    pub fn image(text: impl Into<String>) -> Self {
        Self::new(ElementType::Image, text)
    }

    #[must_use = "creates a new figure caption element"]
    pub fn figure_caption(text: impl Into<String>) -> Self {
        Self::new(ElementType::FigureCaption, text)
    }

    #[must_use = "creates a new header element"]
    pub fn header(text: impl Into<String>) -> Self {
        Self::new(ElementType::Header, text)
    }

    #[must_use = "creates a new footer element"]
    pub fn footer(text: impl Into<String>) -> Self {
        Self::new(ElementType::Footer, text)
    }

    #[must_use = "creates a new formula element"]
    pub fn formula(text: impl Into<String>) -> Self {
        Self::new(ElementType::Formula, text)
    }

    #[must_use = "creates a new page break element"]
    pub fn page_break() -> Self {
        Self::new(ElementType::PageBreak, "")
    }

    #[inline]
    #[must_use = "returns the element with metadata set"]
    pub fn with_metadata(mut self, metadata: ElementMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    #[must_use = "returns the element with an explicit id"]
    pub fn with_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    #[inline]
    #[must_use = "returns the element with its tag context set"]
    pub fn with_tag_context(mut self, tag_context: TagContext) -> Self {
        self.tag_context = Some(tag_context);
        self
    }

    /// Applies an id mode.
    ///
    /// `Random` assigns a fresh UUID; `ContentHash` drops any explicit id so
    /// the id follows the text again.
    #[must_use = "returns the element with the id mode applied"]
    pub fn with_id_mode(mut self, mode: IdMode) -> Self {
        match mode {
            IdMode::ContentHash => self.element_id = None,
            IdMode::Random => self.assign_random_id(),
        }
        self
    }

    /// Replaces the id with a fresh UUID v4.
    pub fn assign_random_id(&mut self) {
        self.element_id = Some(uuid::Uuid::new_v4().to_string());
    }

    /// The element id: the explicit one if set, otherwise the content hash of
    /// the current text.
    #[must_use = "returns the element id"]
    pub fn id(&self) -> Cow<'_, str> {
        match &self.element_id {
            Some(id) => Cow::Borrowed(id.as_str()),
            None => Cow::Owned(content_hash_id(&self.text)),
        }
    }

    /// True when the id was set explicitly rather than derived from the text.
    #[inline]
    #[must_use = "returns whether the element has an explicit id"]
    pub const fn has_explicit_id(&self) -> bool {
        self.element_id.is_some()
    }

    /// Serialized type string, e.g. `"NarrativeText"`.
    #[inline]
    #[must_use = "returns the category of the element"]
    pub const fn category(&self) -> &'static str {
        self.element_type.as_str()
    }

    /// Runs `transforms` over the text in order and stores the result.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::InvalidTransformOutput`] if a transform produces
    /// no string; the text is then left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpart_core::cleaners::{clean_bullets, clean_extra_whitespace};
    /// use docpart_core::Element;
    ///
    /// let mut item = Element::list_item("●  Fresh   apples");
    /// item.apply(&[&clean_bullets, &clean_extra_whitespace])?;
    /// assert_eq!(item.text, "Fresh apples");
    /// # Ok::<(), docpart_core::DocpartError>(())
    /// ```
    pub fn apply(&mut self, transforms: &[&dyn TextTransform]) -> Result<()> {
        let mut text = self.text.clone();
        for (position, transform) in transforms.iter().enumerate() {
            text = transform.transform(&text).ok_or_else(|| {
                DocpartError::InvalidTransformOutput(format!(
                    "transform {position} did not return a string"
                ))
            })?;
        }
        self.text = text;
        Ok(())
    }

    /// Moves the coordinates into `new_system` in place and returns the new
    /// points, or `None` if the element has no coordinates.
    pub fn convert_coordinates_to_new_system(
        &mut self,
        new_system: CoordinateSystem,
    ) -> Option<Vec<Point>> {
        let coordinates = self.metadata.coordinates.as_mut()?;
        let converted = coordinates.converted_points(&new_system);
        coordinates.points.clone_from(&converted);
        coordinates.system = new_system;
        Some(converted)
    }

    /// The element as a JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::JsonError`] if a metadata value cannot be
    /// represented in JSON (for example a non-finite float).
    pub fn to_record(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuilds an element from a JSON record, ignoring unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::JsonError`] if the record is not an object with
    /// a `type` key, or if its coordinates are inconsistent.
    pub fn from_record(record: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(record)?)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type
            && self.text == other.text
            && self.metadata == other.metadata
    }
}

#[derive(Serialize)]
struct ElementRecordRef<'a> {
    #[serde(rename = "type")]
    element_type: &'static str,
    element_id: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    text: &'a str,
    metadata: &'a ElementMetadata,
}

#[derive(Deserialize)]
struct ElementRecord {
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default)]
    element_id: Option<String>,
    #[serde(default)]
    checked: Option<bool>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: ElementMetadata,
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ElementRecordRef {
            element_type: self.element_type.as_str(),
            element_id: self.id(),
            checked: self.element_type.checked(),
            text: &self.text,
            metadata: &self.metadata,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = ElementRecord::deserialize(deserializer)?;
        let element_type = match ElementType::from_label(&record.element_type) {
            ElementType::CheckBox { .. } => ElementType::CheckBox {
                checked: record.checked.unwrap_or(false),
            },
            other => other,
        };
        Ok(Self {
            element_id: record.element_id,
            element_type,
            text: record.text,
            metadata: record.metadata,
            tag_context: None,
        })
    }
}
