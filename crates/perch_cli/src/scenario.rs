//! Placement scenario files
//!
//! A scenario describes one activation: the viewport, the geometry of the
//! activator and content (plus list and selected item for auto mode) and the
//! placement config. It is replayed on a headless surface.
//!
//! ```toml
//! [viewport]
//! width = 800
//! height = 600
//!
//! [activator]
//! x = 50
//! y = 100
//! width = 40
//! height = 20
//!
//! [content]
//! width = 100
//! height = 200
//! hidden = true
//!
//! [placement]
//! anchor = { bottom = true, right = true }
//! ```

use anyhow::{Context, Result};
use perch_core::{Bounds, ContentStyle, Dimensions, Direction};
use perch_layout::{
    ElementId, EngineConfig, Handles, HeadlessSurface, OverlayStack, PlacementConfig,
    PositioningSession, SessionSignal, Viewport,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Frames simulated before giving up on visibility
const MAX_FRAMES: usize = 4;

/// One element on the headless surface
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SceneElement {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Offset inside the scroll container (selected item)
    #[serde(default)]
    pub offset_top: Option<f32>,
    /// Full scrollable height (list)
    #[serde(default)]
    pub scroll_height: Option<f32>,
    /// Start with `display: none`
    #[serde(default)]
    pub hidden: bool,
}

impl SceneElement {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Scenario file contents
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Scenario {
    pub viewport: Viewport,
    #[serde(default)]
    pub activator: Option<SceneElement>,
    pub content: SceneElement,
    #[serde(default)]
    pub list: Option<SceneElement>,
    #[serde(default)]
    pub selected: Option<SceneElement>,
    /// Overrides the engine config's placement when present
    #[serde(default)]
    pub placement: Option<PlacementConfig>,
}

/// Outcome of replaying a scenario
#[derive(Clone, Debug, Serialize)]
pub struct SolveReport {
    pub direction: Direction,
    pub flipped: bool,
    pub solve_count: usize,
    pub z_index: i32,
    pub style: ContentStyle,
    /// Style as CSS declarations, in application order
    pub css: Vec<(&'static str, String)>,
    pub scroll: Option<f32>,
    /// Frames until visibility was authorized
    pub frames_until_visible: Option<usize>,
    pub dimensions: Dimensions,
}

impl Scenario {
    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        Ok(scenario)
    }

    /// Replay the scenario on a headless surface
    pub fn run(&self, engine: &EngineConfig) -> Result<SolveReport> {
        let config = self.placement.unwrap_or(engine.placement);
        let mut surface = HeadlessSurface::with_viewport(self.viewport);

        let content = insert(&mut surface, &self.content);
        let mut handles = Handles::new(content);
        if let Some(element) = &self.activator {
            handles = handles.activator(insert(&mut surface, element));
        }
        if let Some(element) = &self.list {
            handles = handles.list(insert(&mut surface, element));
        }
        if let Some(element) = &self.selected {
            handles = handles.selected(insert(&mut surface, element));
        }

        let mut stack = OverlayStack::with_config(engine.stack);
        let id = stack.allocate_id();
        let mut session = PositioningSession::new(id, stack.into_shared()).with_config(config);
        session.provide_handles(handles);
        session
            .activate(&mut surface)
            .context("Scenario cannot be activated")?;

        let mut frames_until_visible = None;
        for frame in 1..=MAX_FRAMES {
            session.on_frame();
            if session
                .take_signals()
                .contains(&SessionSignal::VisibilityAuthorized)
            {
                frames_until_visible = Some(frame);
                break;
            }
        }

        let style = session
            .style()
            .context("Session committed no style")?;
        let dimensions = session
            .dimensions()
            .copied()
            .context("Session holds no dimensions")?;
        let direction = session.direction();

        tracing::debug!(
            "scenario: overlay {} placed with {} solve(s)",
            id.id(),
            session.solve_count()
        );

        Ok(SolveReport {
            direction,
            flipped: direction != Direction::initial(config.anchor, config.auto),
            solve_count: session.solve_count(),
            z_index: style.z_index,
            style,
            css: style.declarations(),
            scroll: session.scroll(),
            frames_until_visible,
            dimensions,
        })
    }
}

fn insert(surface: &mut HeadlessSurface, element: &SceneElement) -> ElementId {
    let id = surface.insert(element.bounds());
    if let Some(offset_top) = element.offset_top {
        surface.set_offset_top(id, offset_top);
    }
    if let Some(scroll_height) = element.scroll_height {
        surface.set_scroll_height(id, scroll_height);
    }
    if element.hidden {
        surface.hide(id);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::{Length, Position, Vertical};

    const MENU: &str = r#"
        [viewport]
        width = 800
        height = 600

        [activator]
        x = 50
        y = 100
        width = 40
        height = 20

        [content]
        width = 100
        height = 200
        hidden = true
    "#;

    #[test]
    fn test_menu_scenario() {
        let scenario = Scenario::from_toml_str(MENU).unwrap();
        let report = scenario.run(&EngineConfig::default()).unwrap();

        assert_eq!(report.style.position, Position::at(50.0, 120.0));
        assert!(!report.flipped);
        assert_eq!(report.solve_count, 1);
        assert_eq!(report.z_index, 6);
        assert_eq!(report.frames_until_visible, Some(1));
        assert_eq!(report.css[0], ("left", "50px".to_string()));
    }

    #[test]
    fn test_flip_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
            [viewport]
            width = 800
            height = 600

            [activator]
            x = 50
            y = 550
            width = 40
            height = 20

            [content]
            width = 100
            height = 500
            "#,
        )
        .unwrap();
        let report = scenario.run(&EngineConfig::default()).unwrap();

        assert!(report.flipped);
        assert_eq!(report.solve_count, 2);
        assert_eq!(report.direction.vert, Vertical::Top);
        assert_eq!(report.style.position.top_px(), Some(50.0));
    }

    #[test]
    fn test_auto_scenario_waits_two_frames() {
        let scenario = Scenario::from_toml_str(
            r#"
            [viewport]
            width = 800
            height = 600

            [activator]
            x = 50
            y = 300
            width = 200
            height = 20

            [content]
            width = 200
            height = 200
            hidden = true

            [list]
            width = 200
            height = 200
            scroll_height = 400

            [selected]
            width = 200
            height = 20
            offset_top = 40

            [placement]
            auto = true
            "#,
        )
        .unwrap();
        let report = scenario.run(&EngineConfig::default()).unwrap();

        let scroll = report.scroll.unwrap();
        assert!((0.0..=200.0).contains(&scroll));
        assert_eq!(report.frames_until_visible, Some(2));
        assert_eq!(report.style.min_width, Length::Px(216.0));
    }

    #[test]
    fn test_engine_config_placement_is_the_default() {
        let scenario = Scenario::from_toml_str(MENU).unwrap();
        let engine = EngineConfig::from_toml_str("[placement.nudge]\nbottom = 4\n").unwrap();
        let report = scenario.run(&engine).unwrap();
        assert_eq!(report.style.position.top_px(), Some(124.0));
    }

    #[test]
    fn test_missing_activator_fails() {
        let scenario = Scenario::from_toml_str(
            r#"
            [viewport]
            width = 800
            height = 600

            [content]
            width = 100
            height = 200
            "#,
        )
        .unwrap();
        assert!(scenario.run(&EngineConfig::default()).is_err());
    }
}
