//! Gameplay configuration.
//!
//! Every constant the game loop uses lives in [`GameConfig`]. The defaults
//! reproduce the classic 640x700 board. Partial JSON files are accepted; any
//! missing field keeps its default.
//!
//! ```
//! use breakout_core::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "starting_lives": 5 }"#).unwrap();
//! assert_eq!(config.starting_lives, 5);
//! assert_eq!(config.points_per_brick, 100);
//! ```

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable gameplay constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width.
    pub board_width: f32,
    /// Playfield height.
    pub board_height: f32,
    /// Thickness of the wall and bottom bodies placed outside the playfield.
    pub wall_thickness: f32,

    /// Paddle width and height.
    pub paddle_size: Vec2,
    /// Gap between the paddle's top edge and the board bottom.
    pub paddle_offset: f32,
    /// Horizontal paddle speed in units per tick.
    pub paddle_speed: f32,

    /// Ball radius.
    pub ball_radius: f32,
    /// Velocity given to every newly spawned ball.
    pub ball_launch_velocity: Vec2,
    /// Minimum magnitude of each ball velocity component.
    pub ball_min_speed: f32,
    /// Ball restitution.
    pub ball_restitution: f32,
    /// Ball density.
    pub ball_density: f32,

    /// Horizontal and vertical spacing of the brick grid.
    pub brick_cell: Vec2,
    /// Brick body size.
    pub brick_size: Vec2,
    /// Y offset of the first brick row (clears the HUD margin).
    pub brick_top_margin: f32,

    /// Lives at game start.
    pub starting_lives: u32,
    /// Score awarded per destroyed brick.
    pub points_per_brick: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 640.0,
            board_height: 700.0,
            wall_thickness: 120.0,
            paddle_size: Vec2::new(128.0, 24.0),
            paddle_offset: 24.0,
            paddle_speed: 5.0,
            ball_radius: 12.0,
            ball_launch_velocity: Vec2::new(5.0, -5.0),
            ball_min_speed: 5.0,
            ball_restitution: 1.0,
            ball_density: 0.3,
            brick_cell: Vec2::new(64.0, 32.0),
            brick_size: Vec2::new(64.0, 32.0),
            brick_top_margin: 30.0,
            starting_lives: 3,
            points_per_brick: 100,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`GameConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a non-negative finite number",
                })
            }
        }

        positive("board_width", self.board_width)?;
        positive("board_height", self.board_height)?;
        positive("wall_thickness", self.wall_thickness)?;
        positive("paddle_size.x", self.paddle_size.x)?;
        positive("paddle_size.y", self.paddle_size.y)?;
        positive("paddle_offset", self.paddle_offset)?;
        positive("paddle_speed", self.paddle_speed)?;
        positive("ball_radius", self.ball_radius)?;
        positive("ball_min_speed", self.ball_min_speed)?;
        positive("ball_density", self.ball_density)?;
        positive("brick_cell.x", self.brick_cell.x)?;
        positive("brick_cell.y", self.brick_cell.y)?;
        positive("brick_size.x", self.brick_size.x)?;
        positive("brick_size.y", self.brick_size.y)?;
        non_negative("brick_top_margin", self.brick_top_margin)?;

        if !self.ball_launch_velocity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "ball_launch_velocity",
                reason: "must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.ball_restitution) {
            return Err(ConfigError::Invalid {
                field: "ball_restitution",
                reason: "must be within 0.0..=1.0",
            });
        }
        if self.paddle_size.x > self.board_width {
            return Err(ConfigError::Invalid {
                field: "paddle_size.x",
                reason: "must not exceed board_width",
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Board center point.
    #[must_use]
    pub fn board_center(&self) -> Vec2 {
        Vec2::new(self.board_width, self.board_height) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn defaults_match_classic_board() {
        let config = GameConfig::default();
        assert_eq!(config.board_center(), Vec2::new(320.0, 350.0));
        assert_eq!(config.ball_launch_velocity, Vec2::new(5.0, -5.0));
        assert_eq!(config.starting_lives, 3);
        assert!((config.ball_min_speed - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "paddle_speed": 8.0 }"#).unwrap();
        assert!((config.paddle_speed - 8.0).abs() < f32::EPSILON);
        assert_eq!(config.brick_cell, Vec2::new(64.0, 32.0));
    }

    #[test]
    fn zero_lives_rejected() {
        let err = GameConfig::from_json_str(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "starting_lives",
                ..
            }
        ));
    }

    #[test]
    fn negative_speed_rejected() {
        let err = GameConfig::from_json_str(r#"{ "ball_min_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "ball_min_speed",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_layout_rejected() {
        let margin = GameConfig {
            brick_top_margin: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            margin.validate(),
            Err(ConfigError::Invalid { field: "brick_top_margin", .. })
        ));

        let offset = GameConfig {
            paddle_offset: f32::INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(
            offset.validate(),
            Err(ConfigError::Invalid { field: "paddle_offset", .. })
        ));

        let density = GameConfig {
            ball_density: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            density.validate(),
            Err(ConfigError::Invalid { field: "ball_density", .. })
        ));
    }

    #[test]
    fn zero_top_margin_allowed() {
        let config = GameConfig {
            brick_top_margin: 0.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_paddle_rejected() {
        let err =
            GameConfig::from_json_str(r#"{ "board_width": 100.0, "paddle_size": [128.0, 24.0] }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paddle_size.x", .. }));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }
}
