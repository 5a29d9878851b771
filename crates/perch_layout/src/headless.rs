//! Headless surface
//!
//! An in-memory [`Surface`] for tests, tooling and server-side placement.
//! It reports the same facts a browser would: hidden elements measure as an
//! empty box at the origin, removed elements are detached.

use indexmap::IndexMap;
use perch_core::Bounds;

use crate::surface::{DisplayMode, ElementBox, PeekStyle, Surface, Viewport};

/// Handle to an element on a [`HeadlessSurface`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Reconstruct a handle from a raw ID
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct HeadlessElement {
    bounds: Bounds,
    style: PeekStyle,
    offset_top: f32,
    scroll_height: Option<f32>,
    /// Set when a style override made the element paint visibly
    flashed: bool,
}

/// In-memory element store implementing [`Surface`]
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    elements: IndexMap<ElementId, HeadlessElement>,
    next_id: u32,
    viewport: Viewport,
    peek_count: usize,
    layout_passes: usize,
}

impl HeadlessSurface {
    /// Create a surface with the given viewport size
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Viewport::new(width, height))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            elements: IndexMap::new(),
            next_id: 1,
            viewport,
            peek_count: 0,
            layout_passes: 0,
        }
    }

    /// Add a visible element
    pub fn insert(&mut self, bounds: Bounds) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            HeadlessElement {
                bounds,
                style: PeekStyle::default(),
                offset_top: 0.0,
                scroll_height: None,
                flashed: false,
            },
        );
        id
    }

    /// Detach an element; later queries treat it as removed
    pub fn remove(&mut self, id: ElementId) {
        self.elements.shift_remove(&id);
    }

    /// Move or resize an element
    pub fn set_bounds(&mut self, id: ElementId, bounds: Bounds) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.bounds = bounds;
        }
    }

    /// `display: none`
    pub fn hide(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.style.display = DisplayMode::None;
        }
    }

    /// Offset of the element inside its scroll container
    pub fn set_offset_top(&mut self, id: ElementId, offset_top: f32) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.offset_top = offset_top;
        }
    }

    /// Full scrollable height of the element
    pub fn set_scroll_height(&mut self, id: ElementId, scroll_height: f32) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.scroll_height = Some(scroll_height);
        }
    }

    /// Number of sneak peeks performed so far
    pub fn peek_count(&self) -> usize {
        self.peek_count
    }

    /// Number of layout queries answered so far
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Whether a style override ever made the element paint visibly
    pub fn was_visibly_painted(&self, id: ElementId) -> bool {
        self.elements.get(&id).map(|el| el.flashed).unwrap_or(false)
    }
}

impl Surface for HeadlessSurface {
    type Handle = ElementId;

    fn element_box(&mut self, handle: ElementId) -> Option<ElementBox> {
        self.layout_passes += 1;
        let el = self.elements.get(&handle)?;
        if el.style.is_hidden() {
            return Some(ElementBox {
                bounds: Bounds::ZERO,
                offset_top: 0.0,
                scroll_height: 0.0,
            });
        }
        Some(ElementBox {
            bounds: el.bounds,
            offset_top: el.offset_top,
            scroll_height: el.scroll_height.unwrap_or(el.bounds.height),
        })
    }

    fn peek_style(&self, handle: ElementId) -> Option<PeekStyle> {
        self.elements.get(&handle).map(|el| el.style)
    }

    fn set_peek_style(&mut self, handle: ElementId, style: PeekStyle) {
        if style == PeekStyle::PEEK {
            self.peek_count += 1;
        }
        if let Some(el) = self.elements.get_mut(&handle) {
            if !style.is_hidden() && style.opacity > 0.0 {
                el.flashed = true;
            }
            el.style = style;
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
