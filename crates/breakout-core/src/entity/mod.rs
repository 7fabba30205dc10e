//! Entity types for the Breakout board.
//!
//! - [`EntityId`]: unique, never-reused identifier
//! - [`EntityKind`]: capability tag fixed at spawn
//! - [`SpawnState`]: initial position and optional components
//! - [`Entity`]: the record the arena stores per entity
//!
//! # Architecture
//!
//! Entities carry only identity, kind and position. Optional component records
//! ([`PhysicsBody`], [`BoundingShape`]) live in sparse tables inside the
//! [`Arena`](crate::arena::Arena) and are looked up by id, so gameplay code
//! never downcasts.
//!
//! # Example
//!
//! ```
//! use breakout_core::entity::{Entity, EntityId, EntityKind};
//! use glam::Vec2;
//!
//! let brick = Entity::new(EntityId::new(7), EntityKind::Brick, Vec2::new(64.0, 30.0));
//!
//! assert_eq!(brick.id().as_u64(), 7);
//! assert!(brick.is(EntityKind::Brick));
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{BodyType, BoundingShape, PhysicsBody};

/// Unique identifier for an entity.
///
/// Ids are handed out monotonically by the arena and never reused, so an id
/// held past its entity's removal can be detected as stale but never aliases a
/// newer entity.
///
/// ```
/// use breakout_core::entity::EntityId;
///
/// assert!(EntityId::new(1) < EntityId::new(2));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// What an entity is. Drives collision-rule dispatch.
///
/// The derived ordering is used to normalize collision pairs, so the variant
/// order is part of the dispatch contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player-controlled kinematic bar.
    Paddle,
    /// The dynamic ball.
    Ball,
    /// Destructible static block.
    Brick,
    /// Left, right and top board bounds.
    Wall,
    /// Kill zone under the paddle.
    Bottom,
}

impl EntityKind {
    /// All kinds, in dispatch order.
    pub const ALL: [Self; 5] = [
        Self::Paddle,
        Self::Ball,
        Self::Brick,
        Self::Wall,
        Self::Bottom,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Paddle => "Paddle",
            Self::Ball => "Ball",
            Self::Brick => "Brick",
            Self::Wall => "Wall",
            Self::Bottom => "Bottom",
        };
        f.write_str(name)
    }
}

/// Initial state passed to [`Arena::spawn`](crate::arena::Arena::spawn).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnState {
    /// Top-left corner of the entity's bounding shape.
    pub position: Vec2,
    /// Physics body, if the entity takes part in simulation.
    pub body: Option<PhysicsBody>,
    /// Collision shape, if the entity can overlap others.
    pub shape: Option<BoundingShape>,
}

impl SpawnState {
    /// A bare state at `position` with no components.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            body: None,
            shape: None,
        }
    }

    /// Attaches a physics body.
    #[must_use]
    pub const fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a bounding shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: BoundingShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// An entity record: id, kind and position.
///
/// The kind is fixed for the entity's lifetime. Position is mutated only by
/// the physics integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Vec2,
}

impl Entity {
    /// Creates an entity record.
    #[must_use]
    pub const fn new(id: EntityId, kind: EntityKind, position: Vec2) -> Self {
        Self { id, kind, position }
    }

    /// The entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Top-left position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the entity.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Returns `true` if this entity has the given kind.
    #[must_use]
    pub fn is(&self, kind: EntityKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn ordering_follows_raw_value() {
            let mut ids = vec![EntityId::new(3), EntityId::new(1), EntityId::new(2)];
            ids.sort();
            assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)]);
        }

        #[test]
        fn debug_and_display() {
            let id = EntityId::new(42);
            assert_eq!(format!("{id:?}"), "EntityId(42)");
            assert_eq!(format!("{id}"), "#42");
        }

        #[test]
        fn from_u64() {
            let id: EntityId = 9u64.into();
            assert_eq!(id.as_u64(), 9);
        }
    }

    mod entity_kind_tests {
        use super::*;

        #[test]
        fn dispatch_order_is_stable() {
            assert!(EntityKind::Paddle < EntityKind::Ball);
            assert!(EntityKind::Ball < EntityKind::Brick);
            assert!(EntityKind::Brick < EntityKind::Wall);
            assert!(EntityKind::Wall < EntityKind::Bottom);
        }

        #[test]
        fn display_names() {
            let names: Vec<String> = EntityKind::ALL.iter().map(ToString::to_string).collect();
            assert_eq!(names, vec!["Paddle", "Ball", "Brick", "Wall", "Bottom"]);
        }

        #[test]
        fn serialization_roundtrip() {
            let json = serde_json::to_string(&EntityKind::Bottom).unwrap();
            let back: EntityKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, EntityKind::Bottom);
        }
    }

    mod spawn_state_tests {
        use super::*;

        #[test]
        fn builder_attaches_components() {
            let state = SpawnState::at(Vec2::new(1.0, 2.0))
                .with_body(PhysicsBody::fixed())
                .with_shape(BoundingShape::Circle { radius: 3.0 });

            assert_eq!(state.position, Vec2::new(1.0, 2.0));
            assert_eq!(state.body, Some(PhysicsBody::fixed()));
            assert_eq!(state.shape, Some(BoundingShape::Circle { radius: 3.0 }));
        }

        #[test]
        fn bare_state_has_no_components() {
            let state = SpawnState::at(Vec2::ZERO);
            assert!(state.body.is_none());
            assert!(state.shape.is_none());
        }
    }

    #[test]
    fn entity_accessors() {
        let mut entity = Entity::new(EntityId::new(1), EntityKind::Ball, Vec2::new(5.0, 5.0));
        assert_eq!(entity.kind(), EntityKind::Ball);
        assert!(entity.is(EntityKind::Ball));
        assert!(!entity.is(EntityKind::Brick));

        entity.set_position(Vec2::new(10.0, 0.0));
        assert_eq!(entity.position(), Vec2::new(10.0, 0.0));
    }
}
