//! Coordinate systems for spatial provenance
//!
//! Layout detectors, OCR engines and PDF renderers each report positions in
//! their own frame: pixel rasters grow downward from the top-left corner while
//! PDF points grow upward from the bottom-left corner. This module gives every
//! frame a name, a size and an [`Orientation`] so points can be moved between
//! frames through the unit square.

use crate::error::{DocpartError, Result};
use serde::{Deserialize, Serialize};

/// A single `(x, y)` position.
pub type Point = (f64, f64);

/// Direction of the axes of a coordinate system.
///
/// Defaults to `Screen` (standard raster coordinate system).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Origin at top-left, y grows downward (images, HTML layout)
    #[default]
    #[serde(rename = "SCREEN")]
    Screen,
    /// Origin at bottom-left, y grows upward (PDF points, unit square)
    #[serde(rename = "CARTESIAN")]
    Cartesian,
}

impl Orientation {
    /// Axis signs `(x, y)` of this orientation.
    ///
    /// The x axis always grows to the right; the y sign is `-1` for screen
    /// space and `+1` for cartesian space.
    #[inline]
    #[must_use = "returns the axis signs of the orientation"]
    pub const fn axis_signs(self) -> (f64, f64) {
        match self {
            Self::Screen => (1.0, -1.0),
            Self::Cartesian => (1.0, 1.0),
        }
    }
}

impl std::fmt::Display for Orientation {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Screen => "SCREEN",
            Self::Cartesian => "CARTESIAN",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Orientation {
    type Err = DocpartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "screen" | "top_left" | "topleft" | "top-left" => Ok(Self::Screen),
            "cartesian" | "bottom_left" | "bottomleft" | "bottom-left" => Ok(Self::Cartesian),
            _ => Err(DocpartError::InvalidInput(format!(
                "unknown coordinate orientation: '{s}'"
            ))),
        }
    }
}

/// The named frames known to the element model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystemKind {
    /// Unit square, cartesian
    Relative,
    /// Raster pixels, screen orientation
    Pixel,
    /// PDF points, cartesian
    Point,
    /// Any other frame; orientation is carried explicitly
    Custom,
}

impl CoordinateSystemKind {
    /// Serialized name of the frame.
    #[inline]
    #[must_use = "returns the serialized name of the coordinate system"]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Relative => "RelativeCoordinateSystem",
            Self::Pixel => "PixelSpace",
            Self::Point => "PointSpace",
            Self::Custom => "CoordinateSystem",
        }
    }

    /// Resolves a serialized name. Unrecognized names yield `None`.
    #[must_use = "returns the coordinate system kind if the name is known"]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RelativeCoordinateSystem" => Some(Self::Relative),
            "PixelSpace" => Some(Self::Pixel),
            "PointSpace" => Some(Self::Point),
            "CoordinateSystem" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Rescales one coordinate between two axes, flipping it when the axis grows
/// in the opposite direction.
///
/// `t_orientation` is the axis sign: `+1.0` keeps the direction, `-1.0`
/// flips it. Both cases are covered by the single expression
/// `((1 - r)(1 - o)/2 + r(1 + o)/2) * new_max` with `r = old_t / old_t_max`.
///
/// `old_t_max` must be non-zero.
///
/// # Examples
///
/// ```
/// use docpart_core::coordinates::convert_coordinate;
///
/// assert_eq!(convert_coordinate(25.0, 100.0, 1.0, 1.0), 0.25);
/// assert_eq!(convert_coordinate(25.0, 100.0, 1.0, -1.0), 0.75);
/// ```
#[inline]
#[must_use = "returns the converted coordinate"]
pub fn convert_coordinate(old_t: f64, old_t_max: f64, new_t_max: f64, t_orientation: f64) -> f64 {
    let ratio = old_t / old_t_max;
    ((1.0 - ratio) * (1.0 - t_orientation) / 2.0 + ratio * (1.0 + t_orientation) / 2.0) * new_t_max
}

/// A named geometric frame with a width, a height and an orientation.
///
/// Width and height must be positive; conversions divide by them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    kind: CoordinateSystemKind,
    width: f64,
    height: f64,
    orientation: Orientation,
}

impl CoordinateSystem {
    /// Creates a custom frame.
    #[inline]
    #[must_use = "creates a new coordinate system"]
    pub const fn new(width: f64, height: f64, orientation: Orientation) -> Self {
        Self {
            kind: CoordinateSystemKind::Custom,
            width,
            height,
            orientation,
        }
    }

    /// The unit square (`RelativeCoordinateSystem`), cartesian.
    #[inline]
    #[must_use = "creates the relative coordinate system"]
    pub const fn relative() -> Self {
        Self {
            kind: CoordinateSystemKind::Relative,
            width: 1.0,
            height: 1.0,
            orientation: Orientation::Cartesian,
        }
    }

    /// A raster frame (`PixelSpace`), screen orientation.
    #[inline]
    #[must_use = "creates a pixel space coordinate system"]
    pub const fn pixel_space(width: f64, height: f64) -> Self {
        Self {
            kind: CoordinateSystemKind::Pixel,
            width,
            height,
            orientation: Orientation::Screen,
        }
    }

    /// A PDF point frame (`PointSpace`), cartesian.
    #[inline]
    #[must_use = "creates a point space coordinate system"]
    pub const fn point_space(width: f64, height: f64) -> Self {
        Self {
            kind: CoordinateSystemKind::Point,
            width,
            height,
            orientation: Orientation::Cartesian,
        }
    }

    /// Rebuilds a frame from its serialized name and layout size.
    ///
    /// The relative system ignores the given size. An unrecognized name is
    /// treated as a custom frame with the given orientation (screen when none
    /// was recorded), so newer producers never break older readers.
    #[must_use = "returns the reconstructed coordinate system"]
    pub fn from_name(
        name: &str,
        width: f64,
        height: f64,
        orientation: Option<Orientation>,
    ) -> Self {
        match CoordinateSystemKind::from_name(name) {
            Some(CoordinateSystemKind::Relative) => Self::relative(),
            Some(CoordinateSystemKind::Pixel) => Self::pixel_space(width, height),
            Some(CoordinateSystemKind::Point) => Self::point_space(width, height),
            Some(CoordinateSystemKind::Custom) => {
                Self::new(width, height, orientation.unwrap_or_default())
            }
            None => {
                log::warn!("unknown coordinate system '{name}', treating it as a custom frame");
                Self::new(width, height, orientation.unwrap_or_default())
            }
        }
    }

    /// Kind of frame.
    #[inline]
    #[must_use = "returns the kind of coordinate system"]
    pub const fn kind(&self) -> CoordinateSystemKind {
        self.kind
    }

    /// Serialized name of the frame.
    #[inline]
    #[must_use = "returns the name of the coordinate system"]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Width of the frame.
    #[inline]
    #[must_use = "returns the width of the coordinate system"]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height of the frame.
    #[inline]
    #[must_use = "returns the height of the coordinate system"]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Orientation of the frame.
    #[inline]
    #[must_use = "returns the orientation of the coordinate system"]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Maps a point of this frame into the unit square.
    #[must_use = "returns the point in relative coordinates"]
    pub fn convert_to_relative(&self, x: f64, y: f64) -> Point {
        let (x_orientation, y_orientation) = self.orientation.axis_signs();
        (
            convert_coordinate(x, self.width, 1.0, x_orientation),
            convert_coordinate(y, self.height, 1.0, y_orientation),
        )
    }

    /// Maps a point of the unit square into this frame.
    #[must_use = "returns the point in this coordinate system"]
    pub fn convert_from_relative(&self, x: f64, y: f64) -> Point {
        let (x_orientation, y_orientation) = self.orientation.axis_signs();
        (
            convert_coordinate(x, 1.0, self.width, x_orientation),
            convert_coordinate(y, 1.0, self.height, y_orientation),
        )
    }

    /// Moves a point of this frame into `new_system`.
    ///
    /// Always passes through the unit square, so converting A to B to C gives
    /// the same point as converting A to C.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpart_core::CoordinateSystem;
    ///
    /// let pixels = CoordinateSystem::pixel_space(200.0, 100.0);
    /// let points = CoordinateSystem::point_space(200.0, 100.0);
    ///
    /// // Same size, opposite vertical direction: y flips to height - y.
    /// assert_eq!(pixels.convert_coordinates_to_new_system(&points, 50.0, 25.0), (50.0, 75.0));
    /// ```
    #[must_use = "returns the point in the new coordinate system"]
    pub fn convert_coordinates_to_new_system(&self, new_system: &Self, x: f64, y: f64) -> Point {
        let (rel_x, rel_y) = self.convert_to_relative(x, y);
        new_system.convert_from_relative(rel_x, rel_y)
    }

    /// Moves every point of a polygon into `new_system`.
    #[must_use = "returns the points in the new coordinate system"]
    pub fn convert_multiple_coordinates_to_new_system(
        &self,
        new_system: &Self,
        points: &[Point],
    ) -> Vec<Point> {
        points
            .iter()
            .map(|&(x, y)| self.convert_coordinates_to_new_system(new_system, x, y))
            .collect()
    }
}

impl Default for CoordinateSystem {
    #[inline]
    fn default() -> Self {
        Self::relative()
    }
}
