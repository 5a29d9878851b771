//! Positioning Session
//!
//! One [`PositioningSession`] drives one floating surface through an
//! activation: register in the overlay stack, measure, solve (and flip once
//! if needed), compute the list scroll in auto mode, commit the content style
//! and finally authorize visibility on the next frame.
//!
//! The session never writes to the host directly. Everything it decides is
//! reported as a [`SessionSignal`] that the host drains with
//! [`PositioningSession::take_signals`] and applies.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ─activate─▶ Measuring ─▶ Solving ─┬──────────────▶ Committed ─frame─▶ Visible
//!                                        ├─▶ Reflowing ─┤
//!                                        └─▶ Scrolling ─┘
//! ```
//!
//! `deactivate` returns any state to `Idle`. Activating again from any state
//! restarts the pipeline.
//!
//! # Example
//!
//! ```rust
//! use perch_core::Bounds;
//! use perch_layout::prelude::*;
//!
//! let mut surface = HeadlessSurface::new(800.0, 600.0);
//! let button = surface.insert(Bounds::new(50.0, 100.0, 40.0, 20.0));
//! let menu = surface.insert(Bounds::new(0.0, 0.0, 100.0, 200.0));
//! surface.hide(menu);
//!
//! let stack = shared_overlay_stack();
//! let mut session = PositioningSession::new(OverlayId::from_raw(1), stack);
//! session.provide_handles(Handles::new(menu).activator(button));
//! session.activate(&mut surface).unwrap();
//!
//! let style = session.style().unwrap();
//! assert_eq!(style.position.left_px(), Some(50.0));
//! assert_eq!(style.position.top_px(), Some(120.0));
//!
//! session.on_frame();
//! assert_eq!(session.state(), SessionState::Visible);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use perch_core::{ContentStyle, Dimensions, Direction, StateTransitions};
use thiserror::Error;

use crate::measure::measure;
use crate::overlay_stack::{OverlayId, RemovedOverlays, SharedOverlayStack};
use crate::placement::{FlipCheck, PlacementConfig, Solver};
use crate::surface::Surface;

// =============================================================================
// Session Events
// =============================================================================

/// Session FSM event types
pub mod session_events {
    /// Start (or restart) an activation
    pub const ACTIVATE: u32 = 30001;
    /// Dimensions captured (Measuring -> Solving)
    pub const MEASURED: u32 = 30002;
    /// First solve asked for a flip (Solving -> Reflowing)
    pub const FLIPPED: u32 = 30003;
    /// Auto mode computed a list scroll offset
    pub const SCROLL: u32 = 30004;
    /// Content style committed
    pub const COMMIT: u32 = 30005;
    /// Host frame elapsed (Committed -> Visible)
    pub const FRAME: u32 = 30006;
    /// Re-measure an active session
    pub const REPOSITION: u32 = 30007;
    /// Close the session
    pub const DEACTIVATE: u32 = 30008;
}

// =============================================================================
// SessionState - FSM for one activation
// =============================================================================

/// State of a positioning session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Not active
    #[default]
    Idle,
    /// Capturing dimensions
    Measuring,
    /// First solver pass
    Solving,
    /// Corrective solver pass after a flip
    Reflowing,
    /// Auto mode list scroll computed
    Scrolling,
    /// Style committed, waiting for the frame that authorizes visibility
    Committed,
    /// Content may be shown
    Visible,
}

impl SessionState {
    /// Check if the session is between activate and deactivate
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Check if the content may be shown
    pub fn is_visible(&self) -> bool {
        matches!(self, SessionState::Visible)
    }

    /// Check if a style has been committed for the current activation
    pub fn is_placed(&self) -> bool {
        matches!(self, SessionState::Committed | SessionState::Visible)
    }
}

impl StateTransitions for SessionState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use session_events::*;
        use SessionState::*;

        match (self, event) {
            // Activation restarts from any state
            (_, ACTIVATE) => Some(Measuring),

            (Measuring, MEASURED) => Some(Solving),

            (Solving, FLIPPED) => Some(Reflowing),

            (Solving, SCROLL) | (Reflowing, SCROLL) => Some(Scrolling),

            (Solving, COMMIT) | (Reflowing, COMMIT) | (Scrolling, COMMIT) => Some(Committed),

            (Committed, FRAME) => Some(Visible),

            (Committed, REPOSITION) | (Visible, REPOSITION) => Some(Measuring),

            (Idle, DEACTIVATE) => None,
            (_, DEACTIVATE) => Some(Idle),

            _ => None,
        }
    }
}

// =============================================================================
// Handles, signals, errors
// =============================================================================

/// Host elements a session measures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handles<H> {
    /// Element the content is anchored to
    pub activator: Option<H>,
    /// The floating panel
    pub content: Option<H>,
    /// Scrollable list inside the content (auto mode)
    pub list: Option<H>,
    /// Selected list item (auto mode)
    pub selected: Option<H>,
}

impl<H> Default for Handles<H> {
    fn default() -> Self {
        Self {
            activator: None,
            content: None,
            list: None,
            selected: None,
        }
    }
}

impl<H> Handles<H> {
    /// Handles with only the content element bound
    pub fn new(content: H) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn activator(mut self, activator: H) -> Self {
        self.activator = Some(activator);
        self
    }

    pub fn list(mut self, list: H) -> Self {
        self.list = Some(list);
        self
    }

    pub fn selected(mut self, selected: H) -> Self {
        self.selected = Some(selected);
        self
    }
}

/// Output of a session, applied by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionSignal {
    /// Registry assigned the content's z-index
    ZIndexAssigned(i32),
    /// Style patch for the content element
    PositionComputed(ContentStyle),
    /// Scroll offset for the list element
    ScrollComputed(f32),
    /// The content may now be shown
    VisibilityAuthorized,
}

/// Activation failures
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No content element bound
    #[error("no content element bound to the session")]
    MissingContent,

    /// No activator element bound and no explicit position configured
    #[error("no activator element bound and no explicit position configured")]
    MissingActivator,
}

// =============================================================================
// PositioningSession
// =============================================================================

/// Positioning controller for one floating surface
#[derive(Debug)]
pub struct PositioningSession<H> {
    id: OverlayId,
    parent: Option<OverlayId>,
    stack: SharedOverlayStack,
    config: PlacementConfig,
    handles: Handles<H>,
    state: SessionState,
    /// Cleared on deactivate; deferred steps check it before acting
    wanted: bool,
    dimensions: Option<Dimensions>,
    direction: Direction,
    solve_count: usize,
    /// Frames left before visibility is authorized
    pending_frames: u8,
    z_index: Option<i32>,
    style: Option<ContentStyle>,
    scroll: Option<f32>,
    signals: Vec<SessionSignal>,
}

impl<H> PositioningSession<H>
where
    H: Copy + Eq + Hash + Debug,
{
    /// Create an idle session registered under `id` in `stack`
    pub fn new(id: OverlayId, stack: SharedOverlayStack) -> Self {
        Self {
            id,
            parent: None,
            stack,
            config: PlacementConfig::default(),
            handles: Handles::default(),
            state: SessionState::Idle,
            wanted: false,
            dimensions: None,
            direction: Direction::default(),
            solve_count: 0,
            pending_frames: 0,
            z_index: None,
            style: None,
            scroll: None,
            signals: Vec::new(),
        }
    }

    /// Open this session from another overlay (submenus, nested dropdowns)
    pub fn with_parent(mut self, parent: OverlayId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_config(mut self, config: PlacementConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the placement config; applies from the next activate or reposition
    pub fn set_config(&mut self, config: PlacementConfig) {
        self.config = config;
    }

    /// Bind the host elements to measure
    pub fn provide_handles(&mut self, handles: Handles<H>) {
        self.handles = handles;
    }

    /// Run a full activation
    ///
    /// Fails without a content element, or without an activator when no
    /// explicit position is configured. A failed activation leaves the
    /// session and the registry untouched.
    pub fn activate<S>(&mut self, surface: &mut S) -> Result<(), SessionError>
    where
        S: Surface<Handle = H>,
    {
        if self.handles.content.is_none() {
            tracing::warn!("session {:?}: activate without a content element", self.id);
            return Err(SessionError::MissingContent);
        }
        if self.handles.activator.is_none() && !self.config.has_explicit_position() {
            tracing::warn!(
                "session {:?}: activate without an activator or explicit position",
                self.id
            );
            return Err(SessionError::MissingActivator);
        }

        self.transition(session_events::ACTIVATE);
        self.wanted = true;
        self.solve_count = 0;
        self.pending_frames = 0;
        self.direction = Direction::initial(self.config.anchor, self.config.auto);

        let z_index = self.stack.borrow_mut().activate(self.id, self.parent);
        self.z_index = Some(z_index);
        self.signals.push(SessionSignal::ZIndexAssigned(z_index));

        self.place(surface, z_index);
        Ok(())
    }

    /// Re-measure and re-solve a placed session, keeping its z-index
    ///
    /// For window resize and scroll. A visible session stays visible.
    /// Sessions that are not placed are left alone.
    pub fn reposition<S>(&mut self, surface: &mut S)
    where
        S: Surface<Handle = H>,
    {
        if self.close_if_orphaned() {
            return;
        }
        let z_index = match self.z_index {
            Some(z_index) if self.wanted && self.state.is_placed() => z_index,
            _ => {
                tracing::debug!(
                    "session {:?}: reposition in {:?}, ignoring",
                    self.id,
                    self.state
                );
                return;
            }
        };

        let was_visible = self.state.is_visible();
        self.transition(session_events::REPOSITION);
        self.solve_count = 0;
        self.direction = Direction::initial(self.config.anchor, self.config.auto);
        self.place(surface, z_index);

        if was_visible {
            self.pending_frames = 0;
            self.transition(session_events::FRAME);
        }
    }

    /// Measure, solve and commit
    fn place<S>(&mut self, surface: &mut S, z_index: i32)
    where
        S: Surface<Handle = H>,
    {
        let dims = self.measure_all(surface);
        self.dimensions = Some(dims);
        self.transition(session_events::MEASURED);

        let config = self.config;
        let solver = Solver::new(&config, surface.viewport());

        let mut solution = solver.solve(&dims, self.direction, FlipCheck::Allow);
        self.solve_count += 1;
        if solution.should_flip {
            self.transition(session_events::FLIPPED);
            self.direction = solution.direction;
            solution = solver.solve(&dims, self.direction, FlipCheck::Locked);
            self.solve_count += 1;
        }

        let placement = solver.place(&dims, solution.offset);

        self.scroll = solver.scroll_offset(&dims, placement.overflow.vert);
        if let Some(scroll) = self.scroll {
            self.transition(session_events::SCROLL);
            self.signals.push(SessionSignal::ScrollComputed(scroll));
        }

        let style = solver.style(&dims, &placement, z_index);
        self.stack
            .borrow_mut()
            .set_content_rect(self.id, placement.content_box);
        self.transition(session_events::COMMIT);
        self.style = Some(style);
        self.signals.push(SessionSignal::PositionComputed(style));

        // A scrolled list needs one more frame to settle before showing
        self.pending_frames = if self.scroll.is_some() { 2 } else { 1 };

        tracing::debug!(
            "session {:?}: committed {:?} direction {:?} after {} solve(s)",
            self.id,
            style.position,
            self.direction,
            self.solve_count
        );
    }

    fn measure_all<S>(&self, surface: &mut S) -> Dimensions
    where
        S: Surface<Handle = H>,
    {
        let activator = self
            .config
            .resolve_activator(measure(surface, self.handles.activator));
        let content = measure(surface, self.handles.content);

        let mut dims = Dimensions::new(activator, content);
        if let Some(list) = self.handles.list {
            dims = dims.with_list(measure(surface, Some(list)));
        }
        if self.config.auto {
            if let Some(selected) = self.handles.selected {
                dims = dims.with_selected(measure(surface, Some(selected)));
            }
        }
        dims
    }

    /// Advance one host frame
    ///
    /// Authorizes visibility once the committed style has settled. Does
    /// nothing after deactivation.
    pub fn on_frame(&mut self) {
        if self.close_if_orphaned() || !self.wanted || self.pending_frames == 0 {
            return;
        }
        self.pending_frames -= 1;
        if self.pending_frames == 0 && self.transition(session_events::FRAME) {
            self.signals.push(SessionSignal::VisibilityAuthorized);
        }
    }

    /// Close the session and remove it (and its dependents) from the registry
    ///
    /// Returns the ids removed from the registry.
    pub fn deactivate(&mut self) -> RemovedOverlays {
        let was_active = self.state.is_active();
        self.close();

        let mut stack = self.stack.borrow_mut();
        if was_active && !stack.is_active(self.id) {
            // Removed together with a parent
            tracing::debug!("session {:?}: already left the overlay stack", self.id);
            return RemovedOverlays::new();
        }
        stack.deactivate(self.id)
    }

    fn close(&mut self) {
        self.wanted = false;
        self.pending_frames = 0;
        self.dimensions = None;
        self.style = None;
        self.scroll = None;
        self.z_index = None;
        self.transition(session_events::DEACTIVATE);
    }

    /// Close an active session whose registry entry is gone
    ///
    /// Deactivating a parent removes its dependents from the stack without
    /// telling their sessions.
    fn close_if_orphaned(&mut self) -> bool {
        if !self.state.is_active() || self.stack.borrow().is_active(self.id) {
            return false;
        }
        tracing::debug!("session {:?}: removed from the overlay stack, closing", self.id);
        self.close();
        true
    }

    fn transition(&mut self, event: u32) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                tracing::debug!(
                    "session {:?}: {:?} -> {:?} (event {})",
                    self.id,
                    self.state,
                    next,
                    event
                );
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Drain the signals produced since the last call
    pub fn take_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Whether an outside click should close this session now
    pub fn closes_on_outside_interaction(&self) -> bool {
        self.state.is_active() && self.stack.borrow().closes_on_outside_interaction(self.id)
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn parent(&self) -> Option<OverlayId> {
        self.parent
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn handles(&self) -> &Handles<H> {
        &self.handles
    }

    /// Snapshot taken by the last measurement, cleared on deactivate
    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    /// Direction in effect after the last solve
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Solver calls made by the current activation or reposition
    pub fn solve_count(&self) -> usize {
        self.solve_count
    }

    pub fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    /// Last committed style
    pub fn style(&self) -> Option<ContentStyle> {
        self.style
    }

    /// Last computed list scroll offset
    pub fn scroll(&self) -> Option<f32> {
        self.scroll
    }

    pub fn is_wanted(&self) -> bool {
        self.wanted
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{ElementId, HeadlessSurface};
    use crate::overlay_stack::shared_overlay_stack;
    use crate::surface::DisplayMode;
    use perch_core::{Bounds, Horizontal, Length, Position, Vertical};

    fn menu_surface(activator: Bounds, content: Bounds) -> (HeadlessSurface, ElementId, ElementId) {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let activator = surface.insert(activator);
        let content = surface.insert(content);
        surface.hide(content);
        (surface, activator, content)
    }

    fn positions(signals: &[SessionSignal]) -> Vec<Position> {
        signals
            .iter()
            .filter_map(|signal| match signal {
                SessionSignal::PositionComputed(style) => Some(style.position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_state_transitions() {
        use session_events::*;

        let state = SessionState::Idle;
        assert_eq!(state.on_event(ACTIVATE), Some(SessionState::Measuring));
        assert_eq!(state.on_event(FRAME), None);
        assert_eq!(state.on_event(DEACTIVATE), None);

        assert_eq!(
            SessionState::Solving.on_event(FLIPPED),
            Some(SessionState::Reflowing)
        );
        assert_eq!(
            SessionState::Reflowing.on_event(COMMIT),
            Some(SessionState::Committed)
        );
        assert_eq!(SessionState::Reflowing.on_event(FLIPPED), None);
        assert_eq!(
            SessionState::Committed.on_event(FRAME),
            Some(SessionState::Visible)
        );
        assert_eq!(
            SessionState::Visible.on_event(DEACTIVATE),
            Some(SessionState::Idle)
        );
        assert_eq!(
            SessionState::Visible.on_event(ACTIVATE),
            Some(SessionState::Measuring)
        );
    }

    #[test]
    fn test_dropdown_below_activator() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack());
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();

        assert_eq!(session.state(), SessionState::Committed);
        assert_eq!(session.solve_count(), 1);

        let signals = session.take_signals();
        assert_eq!(signals[0], SessionSignal::ZIndexAssigned(6));
        assert_eq!(positions(&signals), vec![Position::at(50.0, 120.0)]);

        let style = session.style().unwrap();
        assert_eq!(style.z_index, 6);
        assert_eq!(style.min_width, Length::Px(40.0));

        // Content stays hidden until the host applies the signals
        assert_eq!(
            surface.peek_style(content).unwrap().display,
            DisplayMode::None
        );
        assert!(!surface.was_visibly_painted(content));

        session.on_frame();
        assert_eq!(session.state(), SessionState::Visible);
        assert_eq!(
            session.take_signals(),
            vec![SessionSignal::VisibilityAuthorized]
        );
    }

    #[test]
    fn test_flip_uses_two_solves() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 550.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 500.0),
        );
        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack());
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();

        assert_eq!(session.solve_count(), 2);
        assert_eq!(
            session.direction(),
            Direction::new(Horizontal::Right, Vertical::Top)
        );
        assert_eq!(session.style().unwrap().position.top_px(), Some(50.0));
    }

    #[test]
    fn test_double_activate_is_idempotent() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let stack = shared_overlay_stack();
        let mut session = PositioningSession::new(OverlayId::from_raw(1), stack.clone());
        session.provide_handles(Handles::new(content).activator(activator));

        session.activate(&mut surface).unwrap();
        let first = session.style();
        session.activate(&mut surface).unwrap();

        assert_eq!(session.style(), first);
        assert_eq!(stack.borrow().len(), 1);
        assert!(session.solve_count() <= 2);
    }

    #[test]
    fn test_deactivate_cancels_pending_visibility() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let stack = shared_overlay_stack();
        let mut session = PositioningSession::new(OverlayId::from_raw(1), stack.clone());
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();

        let removed = session.deactivate();
        assert_eq!(removed.as_slice(), &[OverlayId::from_raw(1)]);
        session.take_signals();

        session.on_frame();
        assert!(session.take_signals().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.dimensions().is_none());
        assert!(stack.borrow().is_empty());
    }

    #[test]
    fn test_missing_activator_stays_idle() {
        let (mut surface, _activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let stack = shared_overlay_stack();
        let mut session = PositioningSession::new(OverlayId::from_raw(1), stack.clone());
        session.provide_handles(Handles::new(content));

        assert_eq!(
            session.activate(&mut surface),
            Err(SessionError::MissingActivator)
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.take_signals().is_empty());
        assert!(stack.borrow().is_empty());
    }

    #[test]
    fn test_missing_content_stays_idle() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let mut session: PositioningSession<ElementId> =
            PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack());

        assert_eq!(
            session.activate(&mut surface),
            Err(SessionError::MissingContent)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_explicit_position_without_activator() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let content = surface.insert(Bounds::new(0.0, 0.0, 100.0, 200.0));
        surface.hide(content);

        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack())
            .with_config(PlacementConfig::new().at(300.0, 200.0));
        session.provide_handles(Handles::new(content));
        session.activate(&mut surface).unwrap();

        assert_eq!(session.style().unwrap().position, Position::at(300.0, 200.0));
    }

    #[test]
    fn test_explicit_position_overrides_activator() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack())
            .with_config(PlacementConfig::new().at(400.0, 150.0));
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();

        assert_eq!(session.style().unwrap().position, Position::at(400.0, 150.0));
    }

    #[test]
    fn test_auto_mode_scrolls_then_waits_two_frames() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let activator = surface.insert(Bounds::new(50.0, 300.0, 200.0, 20.0));
        let content = surface.insert(Bounds::new(0.0, 0.0, 200.0, 200.0));
        let list = surface.insert(Bounds::new(0.0, 0.0, 200.0, 200.0));
        let selected = surface.insert(Bounds::new(0.0, 0.0, 200.0, 20.0));
        surface.set_scroll_height(list, 400.0);
        surface.set_offset_top(selected, 190.0);
        surface.hide(content);

        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack())
            .with_config(PlacementConfig::auto());
        session.provide_handles(
            Handles::new(content)
                .activator(activator)
                .list(list)
                .selected(selected),
        );
        session.activate(&mut surface).unwrap();

        let signals = session.take_signals();
        assert!(signals.contains(&SessionSignal::ScrollComputed(100.0)));
        assert_eq!(positions(&signals), vec![Position::at(34.0, 210.0)]);
        assert_eq!(session.style().unwrap().min_width, Length::Px(216.0));

        session.on_frame();
        assert!(session.take_signals().is_empty());
        assert_eq!(session.state(), SessionState::Committed);

        session.on_frame();
        assert_eq!(
            session.take_signals(),
            vec![SessionSignal::VisibilityAuthorized]
        );
    }

    #[test]
    fn test_reposition_keeps_z_index_and_visibility() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let stack = shared_overlay_stack();
        let mut other = PositioningSession::<ElementId>::new(OverlayId::from_raw(9), stack.clone());
        let mut session = PositioningSession::new(OverlayId::from_raw(1), stack.clone());
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();
        session.on_frame();
        session.take_signals();

        surface.set_bounds(activator, Bounds::new(60.0, 140.0, 40.0, 20.0));
        session.reposition(&mut surface);

        let signals = session.take_signals();
        assert_eq!(positions(&signals), vec![Position::at(60.0, 160.0)]);
        assert!(!signals.contains(&SessionSignal::VisibilityAuthorized));
        assert_eq!(session.state(), SessionState::Visible);
        assert_eq!(session.z_index(), Some(6));

        // Idle sessions ignore reposition
        other.reposition(&mut surface);
        assert_eq!(other.state(), SessionState::Idle);
    }

    #[test]
    fn test_set_config_applies_on_reposition() {
        let (mut surface, activator, content) = menu_surface(
            Bounds::new(50.0, 100.0, 40.0, 20.0),
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        );
        let mut session = PositioningSession::new(OverlayId::from_raw(1), shared_overlay_stack());
        session.provide_handles(Handles::new(content).activator(activator));
        session.activate(&mut surface).unwrap();
        session.take_signals();

        session.set_config(PlacementConfig::new().nudge(crate::placement::Nudge {
            bottom: 4.0,
            ..Default::default()
        }));
        assert_eq!(session.config().nudge.bottom, 4.0);
        session.reposition(&mut surface);

        assert_eq!(
            positions(&session.take_signals()),
            vec![Position::at(50.0, 124.0)]
        );
    }

    #[test]
    fn test_nested_sessions_share_the_stack() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let button = surface.insert(Bounds::new(50.0, 100.0, 40.0, 20.0));
        let menu = surface.insert(Bounds::new(0.0, 0.0, 100.0, 200.0));
        let item = surface.insert(Bounds::new(50.0, 130.0, 100.0, 20.0));
        let submenu = surface.insert(Bounds::new(0.0, 0.0, 120.0, 100.0));

        let stack = shared_overlay_stack();
        let menu_id = OverlayId::from_raw(1);
        let submenu_id = OverlayId::from_raw(2);

        let mut parent = PositioningSession::new(menu_id, stack.clone());
        parent.provide_handles(Handles::new(menu).activator(button));
        parent.activate(&mut surface).unwrap();

        let mut child = PositioningSession::new(submenu_id, stack.clone())
            .with_parent(menu_id)
            .with_config(PlacementConfig::new().offset_x(true));
        child.provide_handles(Handles::new(submenu).activator(item));
        child.activate(&mut surface).unwrap();

        assert!(child.z_index() > parent.z_index());
        assert!(!parent.closes_on_outside_interaction());
        assert!(child.closes_on_outside_interaction());
        // Submenu opens beside the item
        assert_eq!(child.style().unwrap().position.left_px(), Some(150.0));

        let removed = parent.deactivate();
        assert_eq!(removed.as_slice(), &[menu_id, submenu_id]);

        // The child was removed with its parent
        assert!(child.deactivate().is_empty());
        assert!(stack.borrow().is_empty());
    }

    #[test]
    fn test_orphaned_child_is_not_authorized() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let button = surface.insert(Bounds::new(50.0, 100.0, 40.0, 20.0));
        let menu = surface.insert(Bounds::new(0.0, 0.0, 100.0, 200.0));
        let item = surface.insert(Bounds::new(50.0, 130.0, 100.0, 20.0));
        let submenu = surface.insert(Bounds::new(0.0, 0.0, 120.0, 100.0));

        let stack = shared_overlay_stack();
        let menu_id = OverlayId::from_raw(1);
        let submenu_id = OverlayId::from_raw(2);

        let mut parent = PositioningSession::new(menu_id, stack.clone());
        parent.provide_handles(Handles::new(menu).activator(button));
        parent.activate(&mut surface).unwrap();

        let mut child = PositioningSession::new(submenu_id, stack.clone()).with_parent(menu_id);
        child.provide_handles(Handles::new(submenu).activator(item));
        child.activate(&mut surface).unwrap();
        assert!(child.is_wanted());
        child.take_signals();

        parent.deactivate();
        assert!(!stack.borrow().is_active(submenu_id));

        child.on_frame();
        assert!(child.take_signals().is_empty());
        assert_eq!(child.state(), SessionState::Idle);
        assert!(!child.is_wanted());
        assert!(child.dimensions().is_none());
        assert!(child.z_index().is_none());

        child.reposition(&mut surface);
        assert!(positions(&child.take_signals()).is_empty());
        assert_eq!(child.state(), SessionState::Idle);
        assert!(stack.borrow().is_empty());
    }

    #[test]
    fn test_orphaned_child_ignores_reposition() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let button = surface.insert(Bounds::new(50.0, 100.0, 40.0, 20.0));
        let menu = surface.insert(Bounds::new(0.0, 0.0, 100.0, 200.0));
        let item = surface.insert(Bounds::new(50.0, 130.0, 100.0, 20.0));
        let submenu = surface.insert(Bounds::new(0.0, 0.0, 120.0, 100.0));

        let stack = shared_overlay_stack();
        let menu_id = OverlayId::from_raw(1);

        let mut parent = PositioningSession::new(menu_id, stack.clone());
        parent.provide_handles(Handles::new(menu).activator(button));
        parent.activate(&mut surface).unwrap();

        let mut child =
            PositioningSession::new(OverlayId::from_raw(2), stack.clone()).with_parent(menu_id);
        child.provide_handles(Handles::new(submenu).activator(item));
        child.activate(&mut surface).unwrap();
        child.on_frame();
        assert!(child.state().is_visible());
        child.take_signals();

        parent.deactivate();
        child.reposition(&mut surface);

        assert!(child.take_signals().is_empty());
        assert_eq!(child.state(), SessionState::Idle);
        assert!(child.style().is_none());
    }
}
