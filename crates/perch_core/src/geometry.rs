//! Geometry for overlay positioning
//!
//! Hosts report raw [`Bounds`] for their elements. Measurements are captured
//! as [`Rect`] snapshots whose edges are rounded to whole device-independent
//! pixels so repeated measurements of an unchanged element compare equal.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Point
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bounds
// ─────────────────────────────────────────────────────────────────────────────

/// Raw element box as reported by the host surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// X position relative to the viewport
    pub x: f32,
    /// Y position relative to the viewport
    pub y: f32,
    /// Rendered width
    pub width: f32,
    /// Rendered height
    pub height: f32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create new bounds
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable measurement snapshot of one element
///
/// `offset_top` is the element's offset inside its scroll container (used for
/// the selected list item) and `scroll_height` the full scrollable height of
/// the element (used for the list).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub offset_top: f32,
    #[serde(default)]
    pub scroll_height: f32,
}

impl Rect {
    /// Degenerate rect anchored at the origin
    pub const ZERO: Rect = Rect {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
        width: 0.0,
        height: 0.0,
        offset_top: 0.0,
        scroll_height: 0.0,
    };

    /// Create a rect from its top-left corner and size, rounding every edge
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        let left = left.round();
        let top = top.round();
        let width = width.round();
        let height = height.round();
        Self {
            top,
            left,
            bottom: top + height,
            right: left + width,
            width,
            height,
            offset_top: 0.0,
            scroll_height: height,
        }
    }

    /// Zero-size rect anchored at a point (explicit `position_x`/`position_y` placement)
    pub fn at_point(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Capture a rect from raw host bounds
    pub fn from_bounds(bounds: Bounds) -> Self {
        Self::new(bounds.x, bounds.y, bounds.width, bounds.height)
    }

    /// Set the offset inside the scroll container
    pub fn with_offset_top(mut self, offset_top: f32) -> Self {
        self.offset_top = offset_top.round();
        self
    }

    /// Set the full scrollable height
    pub fn with_scroll_height(mut self, scroll_height: f32) -> Self {
        self.scroll_height = scroll_height.round();
        self
    }

    /// Check if a point is inside the rect (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Check whether this is the degenerate zero rect
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Check if this rect lies entirely within `[0, width] × [0, height]`
    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        self.left >= 0.0 && self.top >= 0.0 && self.right <= width && self.bottom <= height
    }
}

impl From<Bounds> for Rect {
    fn from(bounds: Bounds) -> Self {
        Rect::from_bounds(bounds)
    }
}
