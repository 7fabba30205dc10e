//! Arena: the entity registry for a Breakout board.
//!
//! The Arena owns every live entity. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Sparse component tables for physics bodies and bounding shapes
//! - Snapshot queries by [`EntityKind`]
//! - Entity lifecycle (spawn/remove) and the simulation tick counter
//!
//! # Snapshots
//!
//! [`Arena::query_by_kind`] returns an owned `Vec`, not an iterator. Callers
//! may remove entities while walking the result; the snapshot is unaffected
//! and later lookups of removed ids simply return `None`.
//!
//! ```
//! # use breakout_core::arena::Arena;
//! # use breakout_core::entity::{EntityKind, SpawnState};
//! # use glam::Vec2;
//! let mut arena = Arena::new();
//! arena.spawn(EntityKind::Brick, SpawnState::at(Vec2::new(0.0, 30.0)));
//! arena.spawn(EntityKind::Brick, SpawnState::at(Vec2::new(64.0, 30.0)));
//!
//! for id in arena.query_by_kind(EntityKind::Brick) {
//!     arena.remove(id);
//! }
//! assert_eq!(arena.count_of_kind(EntityKind::Brick), 0);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::{BoundingShape, Entity, EntityId, EntityKind, PhysicsBody, SpawnState};

/// Container for all entities on the board.
///
/// # Determinism
///
/// Entities and components are kept in `BTreeMap`s keyed by [`EntityId`], and
/// ids are assigned monotonically, so every iteration visits entities in spawn
/// order on every platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Next id to hand out. Never decreases.
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    bodies: BTreeMap<EntityId, PhysicsBody>,
    shapes: BTreeMap<EntityId, BoundingShape>,
    tick: u64,
}

impl Arena {
    /// Creates an empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an entity and returns its id.
    ///
    /// ```
    /// use breakout_core::arena::Arena;
    /// use breakout_core::entity::{EntityKind, PhysicsBody, SpawnState};
    /// use glam::Vec2;
    ///
    /// let mut arena = Arena::new();
    /// let paddle = arena.spawn(
    ///     EntityKind::Paddle,
    ///     SpawnState::at(Vec2::new(256.0, 676.0)).with_body(PhysicsBody::kinematic()),
    /// );
    /// assert!(arena.contains(paddle));
    /// assert!(arena.body(paddle).is_some());
    /// ```
    pub fn spawn(&mut self, kind: EntityKind, state: SpawnState) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        if let Some(body) = state.body {
            self.bodies.insert(id, body);
        }
        if let Some(shape) = state.shape {
            self.shapes.insert(id, shape);
        }
        self.entities.insert(id, Entity::new(id, kind, state.position));

        trace!(entity = %id, %kind, "spawned");
        id
    }

    /// Removes an entity and all of its components.
    ///
    /// Returns the removed record, or `None` if the id was not live.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.bodies.remove(&id);
        self.shapes.remove(&id);
        let removed = self.entities.remove(&id);
        if let Some(entity) = &removed {
            trace!(entity = %id, kind = %entity.kind(), "removed");
        }
        removed
    }

    /// Removes every entity of `kind`. Returns how many were removed.
    pub fn remove_kind(&mut self, kind: EntityKind) -> usize {
        let ids = self.query_by_kind(kind);
        for id in &ids {
            self.remove(*id);
        }
        ids.len()
    }

    /// Returns the entity record for `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns `true` if `id` refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Kind of a live entity.
    #[must_use]
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).map(Entity::kind)
    }

    /// Ids of all live entities of `kind`, in id order.
    ///
    /// The result is a snapshot taken at call time.
    #[must_use]
    pub fn query_by_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.is(kind))
            .map(Entity::id)
            .collect()
    }

    /// Lowest-id live entity of `kind`.
    #[must_use]
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.entities
            .values()
            .find(|entity| entity.is(kind))
            .map(Entity::id)
    }

    /// Number of live entities of `kind`.
    #[must_use]
    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|entity| entity.is(kind)).count()
    }

    /// Iterates over entity ids in deterministic order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -------------------------------------------------------------------------
    // Component access
    // -------------------------------------------------------------------------

    /// Physics body of `id`, if it has one.
    #[must_use]
    pub fn body(&self, id: EntityId) -> Option<&PhysicsBody> {
        self.bodies.get(&id)
    }

    /// Mutable physics body of `id`, if it has one.
    #[must_use]
    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(&id)
    }

    /// Bounding shape of `id`, if it has one.
    #[must_use]
    pub fn shape(&self, id: EntityId) -> Option<&BoundingShape> {
        self.shapes.get(&id)
    }

    /// Top-left position of `id`.
    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(&id).map(Entity::position)
    }

    /// Moves `id`. Returns `false` if it is not live.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Center of `id`'s bounding shape, or its position if it has no shape.
    #[must_use]
    pub fn center(&self, id: EntityId) -> Option<Vec2> {
        let position = self.position(id)?;
        Some(
            self.shapes
                .get(&id)
                .map_or(position, |shape| shape.center(position)),
        )
    }

    /// Linear velocity of `id`, or `None` if it has no body.
    #[must_use]
    pub fn linear_velocity(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|body| body.velocity)
    }

    /// Sets the linear velocity of `id`. Returns `false` if it has no body.
    pub fn set_linear_velocity(&mut self, id: EntityId, velocity: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Iterates over `(id, body)` pairs in deterministic order.
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &PhysicsBody)> + '_ {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
