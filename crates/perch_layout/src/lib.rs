//! Perch Layout Engine
//!
//! Positions floating surfaces (dropdown menus, autocomplete panels,
//! tooltips, dialogs) against the element that opened them and keeps
//! concurrently open overlays stacked in order.
//!
//! # Example
//!
//! ```rust
//! use perch_core::Bounds;
//! use perch_layout::prelude::*;
//!
//! let mut surface = HeadlessSurface::new(800.0, 600.0);
//! let button = surface.insert(Bounds::new(50.0, 550.0, 40.0, 20.0));
//! let menu = surface.insert(Bounds::new(0.0, 0.0, 100.0, 500.0));
//!
//! let stack = shared_overlay_stack();
//! let mut session = PositioningSession::new(OverlayId::from_raw(1), stack);
//! session.provide_handles(Handles::new(menu).activator(button));
//! session.activate(&mut surface).unwrap();
//!
//! // Not enough room below the button, so the menu opens above it
//! assert_eq!(session.style().unwrap().position.top_px(), Some(50.0));
//! assert_eq!(session.solve_count(), 2);
//! ```

pub mod config;
pub mod headless;
pub mod measure;
pub mod overlay_stack;
pub mod placement;
pub mod session;
pub mod surface;

pub use config::{ConfigError, EngineConfig};
pub use headless::{ElementId, HeadlessSurface};
pub use measure::measure;
pub use overlay_stack::{
    shared_overlay_stack, OverlayEntry, OverlayId, OverlayStack, RemovedOverlays,
    SharedOverlayStack, StackConfig,
};
pub use placement::{
    AutoNudge, FlipCheck, Nudge, Offset, Placement, PlacementConfig, Solution, Solver,
};
pub use session::{
    session_events, Handles, PositioningSession, SessionError, SessionSignal, SessionState,
};
pub use surface::{DisplayMode, ElementBox, PeekStyle, Surface, Viewport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::headless::{ElementId, HeadlessSurface};
    pub use crate::overlay_stack::{shared_overlay_stack, OverlayId, OverlayStack, StackConfig};
    pub use crate::placement::{Nudge, PlacementConfig};
    pub use crate::session::{
        Handles, PositioningSession, SessionError, SessionSignal, SessionState,
    };
    pub use crate::surface::{Surface, Viewport};

    pub use perch_core::{AnchorFlags, ContentStyle, Direction, Length, Position, Rect};
}
