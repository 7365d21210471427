//! Sparse metadata attached to every element
//!
//! Serialization writes only the fields that are set, and reading ignores any
//! key it does not know, so records produced by a newer schema still load.

use crate::coordinates::{CoordinateSystem, CoordinateSystemKind, Orientation, Point};
use crate::error::{DocpartError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Points of an element together with the frame they are expressed in.
///
/// Both parts are always present. Use [`CoordinatesMetadata::from_parts`] to
/// build one from optional inputs; it rejects a lone half.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatesMetadata {
    /// Polygon vertices, usually the four corners of a bounding box
    pub points: Vec<Point>,
    /// Frame of `points`
    pub system: CoordinateSystem,
}

impl CoordinatesMetadata {
    /// Creates coordinates metadata from points and their frame.
    #[inline]
    #[must_use = "creates coordinates metadata"]
    pub const fn new(points: Vec<Point>, system: CoordinateSystem) -> Self {
        Self { points, system }
    }

    /// Pairs optional points with an optional frame.
    ///
    /// Returns `Ok(None)` when both are absent.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::CoordinateMismatch`] if exactly one of the two is
    /// supplied.
    pub fn from_parts(
        points: Option<Vec<Point>>,
        system: Option<CoordinateSystem>,
    ) -> Result<Option<Self>> {
        match (points, system) {
            (Some(points), Some(system)) => Ok(Some(Self::new(points, system))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(DocpartError::CoordinateMismatch(
                "coordinates were given without a coordinate system".to_string(),
            )),
            (None, Some(_)) => Err(DocpartError::CoordinateMismatch(
                "a coordinate system was given without coordinates".to_string(),
            )),
        }
    }

    /// Returns the points expressed in `new_system`, leaving `self` unchanged.
    #[must_use = "returns the converted points"]
    pub fn converted_points(&self, new_system: &CoordinateSystem) -> Vec<Point> {
        self.system
            .convert_multiple_coordinates_to_new_system(new_system, &self.points)
    }
}

/// Wire form of [`CoordinatesMetadata`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CoordinatesRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orientation: Option<Orientation>,
}

impl CoordinatesRecord {
    fn from_metadata(coordinates: &CoordinatesMetadata) -> Self {
        let system = &coordinates.system;
        Self {
            points: Some(coordinates.points.clone()),
            system: Some(system.name().to_string()),
            layout_width: Some(system.width()),
            layout_height: Some(system.height()),
            // Named frames imply their orientation; only custom frames record it.
            orientation: (system.kind() == CoordinateSystemKind::Custom)
                .then_some(system.orientation()),
        }
    }

    fn into_metadata(self) -> Result<Option<CoordinatesMetadata>> {
        let system = self.system.map(|name| {
            CoordinateSystem::from_name(
                &name,
                self.layout_width.unwrap_or(1.0),
                self.layout_height.unwrap_or(1.0),
                self.orientation,
            )
        });
        CoordinatesMetadata::from_parts(self.points, system)
    }
}

impl Serialize for CoordinatesMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        CoordinatesRecord::from_metadata(self).serialize(serializer)
    }
}

fn deserialize_coordinates<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<CoordinatesMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<CoordinatesRecord>::deserialize(deserializer)? {
        Some(record) => record.into_metadata().map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Provenance of the document an element came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceMetadata {
    /// Location of the source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Version identifier reported by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Source-specific keys locating the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_locator: Option<BTreeMap<String, serde_json::Value>>,
    /// Creation timestamp as reported by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// Last modification timestamp as reported by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    /// When the document was ingested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_processed: Option<String>,
    /// Access-control entries attached to the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions_data: Option<Vec<serde_json::Value>>,
}

/// Metadata attached to an [`Element`](crate::Element).
///
/// Every field is optional. Equality compares every field, so two elements
/// with the same text but different pages are different elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementMetadata {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_coordinates"
    )]
    pub coordinates: Option<CoordinatesMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,

    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_urls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_texts: Vec<String>,
    /// Offset of each link text inside the element text, `-1` when not found
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_start_indexes: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emphasized_text_contents: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emphasized_text_tags: Vec<String>,

    /// Heading level (zero-based) or list nesting depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_as_html: Option<String>,

    /// Confidence reported by a layout detector
    ///
    /// Must be finite: JSON has no encoding for NaN or infinity, so such a
    /// value would serialize as `null` and read back as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_class_prob: Option<f64>,
    /// Which producer emitted the element, e.g. `"html"` or `"ocr"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_origin: Option<String>,
}

impl ElementMetadata {
    /// Sets the coordinates of this metadata.
    ///
    /// Passing `None` for both clears any existing coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`DocpartError::CoordinateMismatch`] if only one of `points` and
    /// `system` is given.
    pub fn with_coordinates(
        mut self,
        points: Option<Vec<Point>>,
        system: Option<CoordinateSystem>,
    ) -> Result<Self> {
        self.coordinates = CoordinatesMetadata::from_parts(points, system)?;
        Ok(self)
    }

    #[inline]
    #[must_use = "returns metadata with the page number set"]
    pub const fn with_page_number(mut self, page_number: usize) -> Self {
        self.page_number = Some(page_number);
        self
    }

    #[inline]
    #[must_use = "returns metadata with the category depth set"]
    pub const fn with_category_depth(mut self, depth: usize) -> Self {
        self.category_depth = Some(depth);
        self
    }

    #[inline]
    #[must_use = "returns metadata with the filename set"]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// True when no field is set.
    #[must_use = "returns whether the metadata is empty"]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
