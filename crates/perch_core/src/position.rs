//! Position and style patch produced for the content element

use serde::{Deserialize, Serialize};

use crate::length::Length;

/// Absolute position of the content element
///
/// Each field is a pixel length or `auto`. Placement sets `left` and `top`
/// in document coordinates and leaves `right`/`bottom` as `auto`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
}

impl Position {
    /// Position pinned by its top-left corner
    pub fn at(left: f32, top: f32) -> Self {
        Self {
            left: Length::Px(left),
            top: Length::Px(top),
            right: Length::Auto,
            bottom: Length::Auto,
        }
    }

    /// Pixel `left`, if set
    pub fn left_px(&self) -> Option<f32> {
        self.left.px()
    }

    /// Pixel `top`, if set
    pub fn top_px(&self) -> Option<f32> {
        self.top.px()
    }
}

/// Style patch applied to the content element after a solve
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentStyle {
    pub position: Position,
    pub min_width: Length,
    pub max_width: Length,
    pub z_index: i32,
}

impl ContentStyle {
    /// CSS declarations for the patch, in a stable order
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("left", self.position.left.to_string()),
            ("top", self.position.top.to_string()),
            ("right", self.position.right.to_string()),
            ("bottom", self.position.bottom.to_string()),
            ("min-width", self.min_width.to_string()),
            ("max-width", self.max_width.to_string()),
            ("z-index", self.z_index.to_string()),
        ]
    }
}
