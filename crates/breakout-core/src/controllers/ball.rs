//! Ball speed floor.
//!
//! Restitution losses and glancing bounces can leave the ball crawling along
//! one axis. Every tick each velocity component is lifted back to at least
//! `min_speed`, keeping its sign.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::arena::Arena;
use crate::entity::EntityKind;

/// Lifts each component of `velocity` to at least `min_speed` in magnitude.
///
/// Direction is preserved; a zero component follows its sign bit, so `+0.0`
/// becomes `+min_speed` and `-0.0` becomes `-min_speed`. Components already
/// at or above the floor are untouched. Non-finite components reset to
/// `+min_speed`.
///
/// ```
/// use breakout_core::controllers::clamp_velocity;
/// use glam::Vec2;
///
/// assert_eq!(clamp_velocity(Vec2::new(-1.0, 8.0), 5.0), Vec2::new(-5.0, 8.0));
/// ```
#[must_use]
pub fn clamp_velocity(velocity: Vec2, min_speed: f32) -> Vec2 {
    Vec2::new(
        clamp_component(velocity.x, min_speed),
        clamp_component(velocity.y, min_speed),
    )
}

fn clamp_component(value: f32, min_speed: f32) -> f32 {
    if !value.is_finite() {
        return min_speed;
    }
    if value.abs() < min_speed {
        min_speed.copysign(value)
    } else {
        value
    }
}

/// Applies [`clamp_velocity`] to every ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallController {
    min_speed: f32,
}

impl BallController {
    /// Creates a controller with the given floor.
    #[must_use]
    pub const fn new(min_speed: f32) -> Self {
        Self { min_speed }
    }

    /// Clamps every ball's velocity. Returns how many balls were adjusted.
    pub fn update(&self, arena: &mut Arena) -> usize {
        let mut adjusted = 0;
        for id in arena.query_by_kind(EntityKind::Ball) {
            let Some(velocity) = arena.linear_velocity(id) else {
                continue;
            };
            if !velocity.is_finite() {
                warn!(entity = %id, ?velocity, "non-finite ball velocity reset");
            }
            let clamped = clamp_velocity(velocity, self.min_speed);
            if clamped != velocity {
                arena.set_linear_velocity(id, clamped);
                adjusted += 1;
            }
        }
        adjusted
    }
}

impl Default for BallController {
    fn default() -> Self {
        Self::new(5.0)
    }
}
