//! Engine configuration
//!
//! Engine-wide defaults loaded from TOML:
//!
//! ```toml
//! [stack]
//! base_z_index = 6
//! z_step = 2
//!
//! [placement]
//! offset_x = false
//! allow_overflow = false
//! min_width = "auto"
//! max_width = "320px"
//!
//! [placement.anchor]
//! top = true
//!
//! [placement.nudge]
//! bottom = 4
//! ```
//!
//! Every key is optional and falls back to the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use perch_core::Length;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::overlay_stack::StackConfig;
use crate::placement::PlacementConfig;

/// Errors raised while loading an engine config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but holds unusable values
    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

/// Root of an engine config file
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// z-index allocation for the overlay stack
    pub stack: StackConfig,
    /// Default placement for new sessions
    pub placement: PlacementConfig,
}

impl EngineConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack.z_step <= 0 {
            return Err(ConfigError::Invalid(format!(
                "stack.z_step must be positive, got {}",
                self.stack.z_step
            )));
        }

        let placement = &self.placement;
        let numbers = [
            ("placement.nudge.top", Some(placement.nudge.top)),
            ("placement.nudge.bottom", Some(placement.nudge.bottom)),
            ("placement.nudge.left", Some(placement.nudge.left)),
            ("placement.nudge.right", Some(placement.nudge.right)),
            (
                "placement.auto_nudge.horizontal",
                Some(placement.auto_nudge.horizontal),
            ),
            (
                "placement.auto_nudge.fallback_vertical",
                Some(placement.auto_nudge.fallback_vertical),
            ),
            ("placement.position_x", placement.position_x),
            ("placement.position_y", placement.position_y),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "{key} must be finite, got {value}"
                    )));
                }
            }
        }

        for (key, length) in [
            ("placement.min_width", placement.min_width),
            ("placement.max_width", placement.max_width),
        ] {
            if let Length::Px(v) = length {
                if v < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{key} must not be negative, got {length}"
                    )));
                }
            }
        }

        if let (Length::Px(min), Length::Px(max)) = (placement.min_width, placement.max_width) {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "placement.min_width ({min}px) exceeds placement.max_width ({max}px)"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay_stack::{OverlayId, OverlayStack};
    use perch_core::AnchorFlags;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.stack.base_z_index, 6);
        assert_eq!(config.stack.z_step, 2);
        assert!(!config.placement.auto);
    }

    #[test]
    fn test_parse_full_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            [stack]
            base_z_index = 100
            z_step = 10

            [placement]
            offset_x = true
            allow_overflow = true
            min_width = 120
            max_width = "320px"
            position_y = 40.5

            [placement.anchor]
            top = true

            [placement.nudge]
            bottom = 4
            left = -2.5

            [placement.auto_nudge]
            horizontal = -12
            "#,
        )
        .unwrap();

        assert_eq!(config.stack.base_z_index, 100);
        assert_eq!(config.stack.z_step, 10);
        assert!(config.placement.offset_x);
        assert!(config.placement.allow_overflow);
        assert_eq!(config.placement.min_width, Length::Px(120.0));
        assert_eq!(config.placement.max_width, Length::Px(320.0));
        assert_eq!(config.placement.position_x, None);
        assert_eq!(config.placement.position_y, Some(40.5));
        assert_eq!(config.placement.anchor, AnchorFlags::top());
        assert_eq!(config.placement.nudge.bottom, 4.0);
        assert_eq!(config.placement.nudge.left, -2.5);
        assert_eq!(config.placement.auto_nudge.horizontal, -12.0);
        assert_eq!(config.placement.auto_nudge.fallback_vertical, -8.0);
    }

    #[test]
    fn test_zero_z_step_is_invalid() {
        let err = EngineConfig::from_toml_str("[stack]\nz_step = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_huge_z_step_activates_without_overflow() {
        let config = EngineConfig::from_toml_str("[stack]\nz_step = 2147483647\n").unwrap();
        let mut stack = OverlayStack::with_config(config.stack);
        stack.activate(OverlayId::from_raw(1), None);
        assert_eq!(stack.activate(OverlayId::from_raw(2), None), i32::MAX);
    }

    #[test]
    fn test_non_finite_position_is_invalid() {
        let err = EngineConfig::from_toml_str("[placement]\nposition_x = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_min_width_above_max_is_invalid() {
        let err = EngineConfig::from_toml_str(
            "[placement]\nmin_width = \"400px\"\nmax_width = \"200px\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_length_is_parse_error() {
        let err = EngineConfig::from_toml_str("[placement]\nmin_width = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load("/nonexistent/perch.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_toml_round_trip_keeps_lengths() {
        let mut config = EngineConfig::default();
        config.placement.max_width = Length::Px(320.0);
        config.placement.position_x = Some(12.0);

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("max_width = \"320px\""));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
