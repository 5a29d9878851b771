//! Host surface abstraction
//!
//! The engine never talks to a rendering backend directly. A host (DOM
//! bridge, native toolkit, headless test double) implements [`Surface`] and
//! the measurement layer drives it.

use std::fmt::Debug;
use std::hash::Hash;

use perch_core::Bounds;
use serde::{Deserialize, Serialize};

/// Visible viewport plus the document scroll offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Inner width in device-independent pixels
    pub width: f32,
    /// Inner height in device-independent pixels
    pub height: f32,
    /// Horizontal document scroll
    #[serde(default)]
    pub scroll_x: f32,
    /// Vertical document scroll
    #[serde(default)]
    pub scroll_y: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn with_scroll(mut self, scroll_x: f32, scroll_y: f32) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

/// Display mode relevant to measurement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Not rendered; reports a zero-size box
    None,
    #[default]
    Block,
    InlineBlock,
}

/// The subset of an element's style the sneak peek touches
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeekStyle {
    pub display: DisplayMode,
    pub opacity: f32,
}

impl Default for PeekStyle {
    fn default() -> Self {
        Self {
            display: DisplayMode::Block,
            opacity: 1.0,
        }
    }
}

impl PeekStyle {
    /// Measurable but invisible
    pub const PEEK: PeekStyle = PeekStyle {
        display: DisplayMode::InlineBlock,
        opacity: 0.0,
    };

    pub fn is_hidden(&self) -> bool {
        self.display == DisplayMode::None
    }
}

/// Raw layout facts for one element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBox {
    /// Bounding box relative to the viewport
    pub bounds: Bounds,
    /// Offset inside the nearest scroll container
    pub offset_top: f32,
    /// Full scrollable height
    pub scroll_height: f32,
}

/// Host platform capability used by the measurement layer
///
/// Implementations may force a layout recalculation in `element_box`; the
/// `&mut self` receivers keep measurement of one element non-reentrant.
pub trait Surface {
    /// Opaque element handle
    type Handle: Copy + Eq + Hash + Debug;

    /// Query an element's layout box
    ///
    /// Returns `None` when the element is detached or was removed.
    fn element_box(&mut self, handle: Self::Handle) -> Option<ElementBox>;

    /// Current display/opacity of an element
    fn peek_style(&self, handle: Self::Handle) -> Option<PeekStyle>;

    /// Override display/opacity of an element
    fn set_peek_style(&mut self, handle: Self::Handle, style: PeekStyle);

    /// Current viewport size and document scroll
    fn viewport(&self) -> Viewport;
}
