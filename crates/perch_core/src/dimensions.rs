//! Measurement snapshot for one positioning session

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Geometry captured for one activation
///
/// A session owns exactly one snapshot and replaces it wholesale whenever it
/// re-measures; the fields are never patched in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// The element the floating surface is anchored to
    pub activator: Rect,
    /// The floating panel itself
    pub content: Rect,
    /// The scrollable list inside the content (auto mode)
    #[serde(default)]
    pub list: Option<Rect>,
    /// The currently selected list item (auto mode)
    #[serde(default)]
    pub selected: Option<Rect>,
}

impl Dimensions {
    /// Snapshot with only activator and content geometry
    pub fn new(activator: Rect, content: Rect) -> Self {
        Self {
            activator,
            content,
            list: None,
            selected: None,
        }
    }

    /// Attach list geometry
    pub fn with_list(mut self, list: Rect) -> Self {
        self.list = Some(list);
        self
    }

    /// Attach selected item geometry
    pub fn with_selected(mut self, selected: Rect) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Full scrollable height of the list
    ///
    /// Falls back to the content's scroll height when no list was measured.
    pub fn list_height(&self) -> f32 {
        match self.list {
            Some(list) => list.scroll_height.max(list.height),
            None => self.content.scroll_height.max(self.content.height),
        }
    }

    /// Largest scroll offset the list can take inside the content
    pub fn max_scroll(&self) -> f32 {
        (self.list_height() - self.content.height).max(0.0)
    }
}
