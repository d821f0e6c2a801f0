//! Pixel-space geometry for detections and the mirrored overlay.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Frame or surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Face bounding box as reported by the analysis engine.
///
/// The engine carries two representations of the same box: the display
/// fields (`x`, `y`, `width`, `height`) and the native-resolution fields
/// (`native_*`). They usually agree; both must stay consistent under
/// every transform applied to the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionBox {
    /// Left edge x-coordinate
    pub x: f64,
    /// Top edge y-coordinate
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    pub native_x: f64,
    pub native_y: f64,
    pub native_width: f64,
    pub native_height: f64,
}

impl DetectionBox {
    /// Create a box whose native fields equal its display fields.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            native_x: x,
            native_y: y,
            native_width: width,
            native_height: height,
        }
    }

    /// Right edge x-coordinate.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Scale every coordinate by independent x and y factors.
    pub fn scale(&self, sx: f64, sy: f64) -> DetectionBox {
        DetectionBox {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
            native_x: self.native_x * sx,
            native_y: self.native_y * sy,
            native_width: self.native_width * sx,
            native_height: self.native_height * sy,
        }
    }
}

/// Corner points of a display-space box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

/// A detection box reflected across the vertical axis of its frame.
///
/// Constructed fresh from a [`DetectionBox`]; never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MirroredBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corners: Corners,
    pub native_x: f64,
    pub native_y: f64,
    pub native_width: f64,
    pub native_height: f64,
    /// Area of the source box (unchanged by mirroring)
    pub area: f64,
    /// Bottom edge of the source box (unchanged by mirroring)
    pub bottom: f64,
}

impl MirroredBox {
    /// Drop the derived fields and return the plain box.
    pub fn to_box(&self) -> DetectionBox {
        DetectionBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            native_x: self.native_x,
            native_y: self.native_y,
            native_width: self.native_width,
            native_height: self.native_height,
        }
    }
}
