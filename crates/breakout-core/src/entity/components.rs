//! Optional component records attached to entities.
//!
//! Components are stored sparsely by the [`Arena`](crate::arena::Arena), keyed
//! by entity id. An entity without a [`PhysicsBody`] takes no part in physics;
//! an entity without a [`BoundingShape`] cannot overlap anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the integrator treats a body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves (walls, bricks, bottom).
    Static,
    /// Moves at its commanded velocity and ignores collision response (paddle).
    Kinematic,
    /// Fully simulated; velocity changes on contact per restitution (ball).
    Dynamic,
}

/// Linear motion state of an entity.
///
/// Velocities are expressed in world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Linear velocity in units per tick.
    pub velocity: Vec2,
    /// Integrator treatment.
    pub body_type: BodyType,
    /// Fraction of normal velocity retained after a bounce (dynamic only).
    pub restitution: f32,
    /// Mass density (dynamic only).
    pub density: f32,
}

impl PhysicsBody {
    /// A static body at rest.
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            velocity: Vec2::ZERO,
            body_type: BodyType::Static,
            restitution: 0.0,
            density: 0.0,
        }
    }

    /// A kinematic body at rest.
    #[must_use]
    pub const fn kinematic() -> Self {
        Self {
            velocity: Vec2::ZERO,
            body_type: BodyType::Kinematic,
            restitution: 0.0,
            density: 0.0,
        }
    }

    /// A dynamic body with the given launch velocity and fixture parameters.
    #[must_use]
    pub const fn dynamic(velocity: Vec2, restitution: f32, density: f32) -> Self {
        Self {
            velocity,
            body_type: BodyType::Dynamic,
            restitution,
            density,
        }
    }

    /// Returns `true` if the integrator moves this body.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        !matches!(self.body_type, BodyType::Static)
    }
}

/// Collision shape, anchored at the entity's top-left position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundingShape {
    /// Axis-aligned rectangle of the given size.
    Box {
        /// Width and height.
        size: Vec2,
    },
    /// Circle inscribed in a `2r x 2r` square.
    Circle {
        /// Radius.
        radius: f32,
    },
}

impl BoundingShape {
    /// Extent of the shape's bounding box.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        match *self {
            Self::Box { size } => size,
            Self::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    /// Center of the shape when its top-left corner sits at `position`.
    #[must_use]
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.extent() * 0.5
    }

    /// Axis-aligned `(min, max)` corners at `position`.
    #[must_use]
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        (position, position + self.extent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_center_is_offset_by_radius() {
        let shape = BoundingShape::Circle { radius: 12.0 };
        assert_eq!(shape.center(Vec2::new(100.0, 50.0)), Vec2::new(112.0, 62.0));
        assert_eq!(shape.extent(), Vec2::new(24.0, 24.0));
    }

    #[test]
    fn box_aabb_spans_size() {
        let shape = BoundingShape::Box {
            size: Vec2::new(64.0, 32.0),
        };
        let (min, max) = shape.aabb(Vec2::new(64.0, 30.0));
        assert_eq!(min, Vec2::new(64.0, 30.0));
        assert_eq!(max, Vec2::new(128.0, 62.0));
    }

    #[test]
    fn only_static_bodies_stay_put() {
        assert!(!PhysicsBody::fixed().is_moving());
        assert!(PhysicsBody::kinematic().is_moving());
        assert!(PhysicsBody::dynamic(Vec2::new(5.0, -5.0), 1.0, 0.3).is_moving());
    }

    #[test]
    fn body_survives_json() {
        let body = PhysicsBody::dynamic(Vec2::new(5.0, -5.0), 1.0, 0.3);
        let json = serde_json::to_string(&body).unwrap();
        let back: PhysicsBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body, back);
    }
}
