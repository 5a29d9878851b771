//! Placement Solver
//!
//! Pure placement math: measured [`Dimensions`] plus a [`PlacementConfig`]
//! go in, a direction, an offset and a viewport-clamped position come out.
//! Nothing here touches a surface, so every rule can be exercised with plain
//! rects.
//!
//! # Modes
//!
//! - **Edge anchor** (menus, tooltips): the content is pinned to an activator
//!   edge and flips to the opposite side when the preferred side lacks room.
//! - **Auto** (select dropdowns): the content is placed so the previously
//!   selected list item lines up with the activator.
//!
//! # Solving
//!
//! A session calls [`Solver::solve`] with [`FlipCheck::Allow`]. If the
//! solution reports `should_flip`, it calls `solve` once more with the new
//! direction and [`FlipCheck::Locked`], which never flips. Two solver calls
//! per activation is therefore the upper bound.

use perch_core::{
    AnchorFlags, ContentStyle, Dimensions, Direction, Horizontal, Length, Position, Rect,
    Vertical,
};
use serde::{Deserialize, Serialize};

use crate::surface::Viewport;

// =============================================================================
// Tuning constants
// =============================================================================

/// Horizontal shift in auto mode so list item text lines up with the activator text
pub const DEFAULT_AUTO_NUDGE_X: f32 = -16.0;

/// Vertical shift in auto mode when no selected item is known
///
/// Lines the first list item up with the activator, like a native select.
pub const DEFAULT_AUTO_FALLBACK_Y: f32 = -8.0;

/// Extra width granted over the activator width in auto mode
pub const AUTO_WIDTH_PADDING: f32 = 16.0;

/// Horizontal room kept free when an `auto` min width is resolved
pub const VIEWPORT_GUTTER: f32 = 24.0;

// =============================================================================
// Configuration
// =============================================================================

/// Pixel nudges applied after the base offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nudge {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Auto-mode nudges, tuned for list items with 16px horizontal and 8px vertical padding
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoNudge {
    /// Horizontal shift applied in auto mode
    pub horizontal: f32,
    /// Vertical shift applied when no item is selected
    pub fallback_vertical: f32,
}

impl Default for AutoNudge {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_AUTO_NUDGE_X,
            fallback_vertical: DEFAULT_AUTO_FALLBACK_Y,
        }
    }
}

/// Declarative placement preferences for one activation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Place the content beside the activator horizontally instead of edge-aligned
    pub offset_x: bool,
    /// Keep the content below/above the activator instead of centering the
    /// selected item
    ///
    /// Only read in auto mode. Edge placement always sits beside the
    /// activator vertically, so the flag has no effect there.
    pub offset_y: bool,
    /// Center the selected list item on the activator
    pub auto: bool,
    /// Skip flipping and viewport clamping
    pub allow_overflow: bool,
    /// Absolute horizontal position, bypassing the activator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f32>,
    /// Absolute vertical position, bypassing the activator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f32>,
    pub min_width: Length,
    pub max_width: Length,
    /// Preferred side flags
    pub anchor: AnchorFlags,
    pub nudge: Nudge,
    pub auto_nudge: AutoNudge,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            anchor: AnchorFlags::default(),
            offset_x: false,
            offset_y: false,
            nudge: Nudge::default(),
            auto: false,
            allow_overflow: false,
            position_x: None,
            position_y: None,
            min_width: Length::Auto,
            max_width: Length::Auto,
            auto_nudge: AutoNudge::default(),
        }
    }
}

impl PlacementConfig {
    /// Edge-anchored placement with default flags
    pub fn new() -> Self {
        Self::default()
    }

    /// Auto-centering placement (select dropdowns)
    pub fn auto() -> Self {
        Self {
            auto: true,
            ..Self::default()
        }
    }

    pub fn anchor(mut self, anchor: AnchorFlags) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn offset_x(mut self, offset_x: bool) -> Self {
        self.offset_x = offset_x;
        self
    }

    pub fn offset_y(mut self, offset_y: bool) -> Self {
        self.offset_y = offset_y;
        self
    }

    pub fn nudge(mut self, nudge: Nudge) -> Self {
        self.nudge = nudge;
        self
    }

    pub fn allow_overflow(mut self, allow: bool) -> Self {
        self.allow_overflow = allow;
        self
    }

    /// Pin the content at an absolute point
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position_x = Some(x);
        self.position_y = Some(y);
        self
    }

    pub fn min_width(mut self, min_width: Length) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn max_width(mut self, max_width: Length) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn auto_nudge(mut self, auto_nudge: AutoNudge) -> Self {
        self.auto_nudge = auto_nudge;
        self
    }

    /// Whether an explicit position overrides at least one activator axis
    pub fn has_explicit_position(&self) -> bool {
        self.position_x.is_some() || self.position_y.is_some()
    }

    /// Flipping only applies to edge-anchored placement inside the viewport
    pub fn can_flip(&self) -> bool {
        !self.allow_overflow && !self.auto
    }

    /// Replace activator axes with the explicit position, if any
    pub fn resolve_activator(&self, measured: Rect) -> Rect {
        if !self.has_explicit_position() {
            return measured;
        }
        let x = self.position_x.unwrap_or(measured.left);
        let y = self.position_y.unwrap_or(measured.top);
        Rect::at_point(x, y)
    }
}

// =============================================================================
// Solver output
// =============================================================================

/// Top-left corner of the content in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub horiz: f32,
    pub vert: f32,
}

/// Whether a solve may flip the direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipCheck {
    /// First solve of an activation
    Allow,
    /// Corrective solve after a flip; the direction is taken as-is
    Locked,
}

/// Result of one solver call
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Offset for the direction the solve was called with
    pub offset: Offset,
    /// Direction to use from now on (flipped when `should_flip`)
    pub direction: Direction,
    pub should_flip: bool,
}

/// Distance from the activator to each viewport edge
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenDistance {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl ScreenDistance {
    pub fn new(activator: &Rect, viewport: Viewport) -> Self {
        Self {
            top: activator.top,
            left: activator.left,
            bottom: viewport.height - activator.bottom,
            right: viewport.width - activator.right,
        }
    }
}

/// Final content placement after overflow clamping
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Content box in viewport coordinates
    pub content_box: Rect,
    /// Inward shift applied per axis (positive moves left/up)
    pub overflow: Offset,
    /// Position in document coordinates
    pub position: Position,
}

// =============================================================================
// Solver
// =============================================================================

/// Placement math for one configuration and viewport
#[derive(Clone, Copy, Debug)]
pub struct Solver<'a> {
    config: &'a PlacementConfig,
    viewport: Viewport,
}

impl<'a> Solver<'a> {
    pub fn new(config: &'a PlacementConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    /// Resolved minimum content width
    pub fn min_width(&self, dims: &Dimensions) -> f32 {
        match self.config.min_width {
            Length::Px(v) => v,
            Length::Auto => {
                let padding = if self.config.auto {
                    AUTO_WIDTH_PADDING
                } else {
                    0.0
                };
                let available = (self.viewport.width - VIEWPORT_GUTTER).max(0.0);
                (dims.activator.width + padding).min(available)
            }
        }
    }

    /// Width the content will occupy once min/max widths apply
    pub fn content_width(&self, dims: &Dimensions) -> f32 {
        let width = dims.content.width.max(self.min_width(dims));
        match self.config.max_width {
            Length::Px(max) => width.min(max),
            Length::Auto => width,
        }
    }

    /// Solve the offset for `direction`, reporting a flip when allowed and needed
    pub fn solve(&self, dims: &Dimensions, direction: Direction, check: FlipCheck) -> Solution {
        let offset = self.offset(dims, direction);

        if check == FlipCheck::Allow && self.config.can_flip() {
            let next = self.flip(dims, direction);
            if next != direction {
                tracing::debug!(
                    "solver: flipping {:?} -> {:?} (offset {:?})",
                    direction,
                    next,
                    offset
                );
                return Solution {
                    offset,
                    direction: next,
                    should_flip: true,
                };
            }
        }

        Solution {
            offset,
            direction,
            should_flip: false,
        }
    }

    /// Base offset plus nudges for a direction
    pub fn offset(&self, dims: &Dimensions, direction: Direction) -> Offset {
        let activator = &dims.activator;
        let nudge = self.config.nudge;

        let horiz = if self.config.auto {
            activator.left + self.config.auto_nudge.horizontal
        } else {
            self.edge_horizontal(dims, direction.horiz)
        };

        let vert = if self.config.auto && !self.config.offset_y {
            self.auto_vertical(dims)
        } else {
            self.edge_vertical(dims, direction.vert)
        };

        Offset {
            horiz: horiz + nudge.right - nudge.left,
            vert: vert + nudge.bottom - nudge.top,
        }
    }

    fn edge_horizontal(&self, dims: &Dimensions, side: Horizontal) -> f32 {
        let activator = &dims.activator;
        let width = self.content_width(dims);
        match (side, self.config.offset_x) {
            (Horizontal::Right, true) => activator.right,
            (Horizontal::Right, false) => activator.left,
            (Horizontal::Left, true) => activator.left - width,
            (Horizontal::Left, false) => activator.right - width,
        }
    }

    fn edge_vertical(&self, dims: &Dimensions, side: Vertical) -> f32 {
        match side {
            Vertical::Bottom => dims.activator.bottom,
            Vertical::Top => dims.activator.top - dims.content.height,
        }
    }

    /// Vertical offset lining the selected item up with the activator
    fn auto_vertical(&self, dims: &Dimensions) -> f32 {
        let activator = &dims.activator;
        match dims.selected {
            None => activator.top + self.config.auto_nudge.fallback_vertical,
            Some(selected) => {
                activator.top + (activator.height - selected.height) / 2.0 - selected.offset_top
                    + ideal_scroll(dims, &selected)
            }
        }
    }

    fn horizontal_room(&self, dist: &ScreenDistance, activator: &Rect, side: Horizontal) -> f32 {
        match (side, self.config.offset_x) {
            (Horizontal::Right, true) => dist.right,
            (Horizontal::Right, false) => self.viewport.width - activator.left,
            (Horizontal::Left, true) => dist.left,
            (Horizontal::Left, false) => activator.right,
        }
    }

    fn vertical_room(dist: &ScreenDistance, side: Vertical) -> f32 {
        match side {
            Vertical::Bottom => dist.bottom,
            Vertical::Top => dist.top,
        }
    }

    /// Direction after flipping every axis whose preferred side lacks room
    ///
    /// An axis flips only when the opposite side offers strictly more room.
    pub fn flip(&self, dims: &Dimensions, direction: Direction) -> Direction {
        let activator = &dims.activator;
        let dist = ScreenDistance::new(activator, self.viewport);
        let width = self.content_width(dims);
        let height = dims.content.height;
        let mut next = direction;

        let room = self.horizontal_room(&dist, activator, direction.horiz);
        let other = self.horizontal_room(&dist, activator, direction.horiz.opposite());
        if width > room && other > room {
            next.horiz = direction.horiz.opposite();
        }

        let room = Self::vertical_room(&dist, direction.vert);
        let other = Self::vertical_room(&dist, direction.vert.opposite());
        if height > room && other > room {
            next.vert = direction.vert.opposite();
        }

        next
    }

    /// Clamp the content box into the viewport and build its position
    pub fn place(&self, dims: &Dimensions, offset: Offset) -> Placement {
        let width = self.content_width(dims);
        let height = dims.content.height;

        let overflow = if self.config.allow_overflow {
            Offset::default()
        } else {
            Offset {
                horiz: axis_overflow(offset.horiz, width, self.viewport.width),
                vert: axis_overflow(offset.vert, height, self.viewport.height),
            }
        };

        let left = offset.horiz - overflow.horiz;
        let top = offset.vert - overflow.vert;
        let content_box = Rect::new(left, top, width, height);

        Placement {
            content_box,
            overflow,
            position: Position::at(
                content_box.left + self.viewport.scroll_x.round(),
                content_box.top + self.viewport.scroll_y.round(),
            ),
        }
    }

    /// List scroll offset for auto mode, `None` when no item is selected
    ///
    /// Clamped to the list's scroll range, with the vertical overflow shift
    /// from [`Solver::place`] subtracted so the item stays on the activator.
    pub fn scroll_offset(&self, dims: &Dimensions, overflow_vert: f32) -> Option<f32> {
        if !self.config.auto || self.config.offset_y {
            return None;
        }
        let selected = dims.selected?;
        let max = dims.max_scroll();
        let scroll = (ideal_scroll(dims, &selected) - overflow_vert).clamp(0.0, max);
        Some(scroll.round())
    }

    /// Style patch for a placement
    pub fn style(&self, dims: &Dimensions, placement: &Placement, z_index: i32) -> ContentStyle {
        ContentStyle {
            position: placement.position,
            min_width: Length::Px(self.min_width(dims).round()),
            max_width: self.config.max_width,
            z_index,
        }
    }
}

/// Scroll that centers the selected item in the content, within the list's range
fn ideal_scroll(dims: &Dimensions, selected: &Rect) -> f32 {
    let scroll_middle = (dims.content.height - selected.height) / 2.0;
    (selected.offset_top - scroll_middle).clamp(0.0, dims.max_scroll())
}

/// Amount to move a span inward so it fits `[0, limit]`
///
/// Spans larger than the limit pin their leading edge to 0.
fn axis_overflow(start: f32, extent: f32, limit: f32) -> f32 {
    let end = start + extent;
    if start < 0.0 || extent > limit {
        start
    } else if end > limit {
        end - limit
    } else {
        0.0
    }
}

// =============================================================================
// Tests
// =============================================================================
