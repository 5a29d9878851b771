//! Anchor directions

use serde::{Deserialize, Serialize};

/// Horizontal side the content extends toward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    #[default]
    Right,
}

impl Horizontal {
    pub fn opposite(self) -> Self {
        match self {
            Horizontal::Left => Horizontal::Right,
            Horizontal::Right => Horizontal::Left,
        }
    }
}

/// Vertical side the content extends toward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Top,
    #[default]
    Bottom,
}

impl Vertical {
    pub fn opposite(self) -> Self {
        match self {
            Vertical::Top => Vertical::Bottom,
            Vertical::Bottom => Vertical::Top,
        }
    }
}

/// Declarative placement flags set by the consuming component
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl AnchorFlags {
    pub fn top() -> Self {
        Self {
            top: true,
            ..Self::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }
}

/// The activator corner currently in effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub horiz: Horizontal,
    pub vert: Vertical,
}

impl Direction {
    pub const fn new(horiz: Horizontal, vert: Vertical) -> Self {
        Self { horiz, vert }
    }

    /// Derive the initial direction from placement flags
    ///
    /// An explicit `bottom`/`right` wins over `top`/`left` when both flags of
    /// one axis are set.
    pub fn from_flags(flags: AnchorFlags) -> Self {
        let horiz = if flags.left && !flags.right {
            Horizontal::Left
        } else {
            Horizontal::Right
        };
        let vert = if flags.top && !flags.bottom {
            Vertical::Top
        } else {
            Vertical::Bottom
        };
        Self { horiz, vert }
    }

    /// Initial direction for a session
    ///
    /// Auto mode always starts from `{Right, Bottom}`.
    pub fn initial(flags: AnchorFlags, auto: bool) -> Self {
        if auto {
            Self::default()
        } else {
            Self::from_flags(flags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_flags() {
        assert_eq!(
            Direction::from_flags(AnchorFlags::default()),
            Direction::new(Horizontal::Right, Vertical::Bottom)
        );
        assert_eq!(
            Direction::from_flags(AnchorFlags {
                top: true,
                left: true,
                ..AnchorFlags::default()
            }),
            Direction::new(Horizontal::Left, Vertical::Top)
        );
    }

    #[test]
    fn test_conflicting_flags_prefer_default_side() {
        let flags = AnchorFlags {
            top: true,
            bottom: true,
            left: true,
            right: true,
        };
        assert_eq!(Direction::from_flags(flags), Direction::default());
    }

    #[test]
    fn test_auto_ignores_flags() {
        assert_eq!(Direction::initial(AnchorFlags::top(), true), Direction::default());
        assert_eq!(
            Direction::initial(AnchorFlags::top(), false).vert,
            Vertical::Top
        );
    }
}
