//! Test helper functions for setting up simulations and feeding contacts.
//!
//! Most gameplay scenarios are easier to express as "the ball touched these
//! entities this tick" than as trajectories. [`ScriptedPhysics`] replaces the
//! integrator with a queue of contact batches that tests fill through a
//! [`ContactFeed`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::{EntityId, EntityKind};
use crate::level::{LevelLoader, StaticLevels};
use crate::physics::{Contact, PhysicsBackend};
use crate::simulation::{Simulation, TickReport};

// =============================================================================
// Scripted Physics
// =============================================================================

/// Handle for queueing contact batches into a [`ScriptedPhysics`].
#[derive(Debug, Clone, Default)]
pub struct ContactFeed(Arc<Mutex<VecDeque<Vec<Contact>>>>);

impl ContactFeed {
    /// Queues one tick's worth of contacts.
    pub fn push(&self, contacts: Vec<Contact>) {
        self.0.lock().unwrap().push_back(contacts);
    }
}

/// Physics backend that moves nothing and replays queued contacts.
#[derive(Debug)]
pub struct ScriptedPhysics {
    feed: ContactFeed,
}

impl PhysicsBackend for ScriptedPhysics {
    fn step(&mut self, _arena: &mut Arena) -> Vec<Contact> {
        self.feed.0.lock().unwrap().pop_front().unwrap_or_default()
    }
}

// =============================================================================
// Simulation Setup
// =============================================================================

/// A simulation on the embedded levels with scripted physics.
pub fn scripted_sim() -> (Simulation, ContactFeed) {
    scripted_with(GameConfig::default(), LevelLoader::default())
}

/// A simulation on in-memory levels with scripted physics.
pub fn scripted_levels(levels: &[&str]) -> (Simulation, ContactFeed) {
    scripted_with(
        GameConfig::default(),
        LevelLoader::new(StaticLevels::new(levels.iter().copied())),
    )
}

/// A simulation with scripted physics.
pub fn scripted_with(config: GameConfig, levels: LevelLoader) -> (Simulation, ContactFeed) {
    let feed = ContactFeed::default();
    let sim = Simulation::new(config, levels)
        .unwrap()
        .with_physics(Box::new(ScriptedPhysics { feed: feed.clone() }));
    (sim, feed)
}

/// A simulation on the embedded levels with the reference integrator.
pub fn physics_sim() -> Simulation {
    Simulation::new(GameConfig::default(), LevelLoader::default()).unwrap()
}

// =============================================================================
// Queries
// =============================================================================

/// The lowest-id entity of `kind`.
///
/// # Panics
///
/// Panics if none exists.
pub fn first(sim: &Simulation, kind: EntityKind) -> EntityId {
    sim.arena()
        .first_of_kind(kind)
        .unwrap_or_else(|| panic!("no {kind} on the board"))
}

/// Moves the ball so its centre sits at `center`, with `velocity`.
pub fn place_ball(sim: &mut Simulation, center: Vec2, velocity: Vec2) -> EntityId {
    let ball = first(sim, EntityKind::Ball);
    let radius = sim.config().ball_radius;
    sim.arena_mut().set_position(ball, center - Vec2::splat(radius));
    sim.arena_mut().set_linear_velocity(ball, velocity);
    ball
}

// =============================================================================
// Scripted Ticks
// =============================================================================

/// Runs one tick delivering `contacts`.
pub fn step_with(sim: &mut Simulation, feed: &ContactFeed, contacts: Vec<Contact>) -> TickReport {
    feed.push(contacts);
    sim.step()
}

/// Runs one tick in which the ball touches `count` bricks.
pub fn hit_bricks(sim: &mut Simulation, feed: &ContactFeed, count: usize) -> TickReport {
    let ball = first(sim, EntityKind::Ball);
    let contacts = sim
        .arena()
        .query_by_kind(EntityKind::Brick)
        .into_iter()
        .take(count)
        .map(|brick| Contact::new(ball, brick))
        .collect();
    step_with(sim, feed, contacts)
}

/// Runs one tick in which the ball touches every brick.
pub fn clear_level(sim: &mut Simulation, feed: &ContactFeed) -> TickReport {
    hit_bricks(sim, feed, usize::MAX)
}

/// Runs one tick in which the ball reaches the bottom.
pub fn lose_ball(sim: &mut Simulation, feed: &ContactFeed) -> TickReport {
    let ball = first(sim, EntityKind::Ball);
    let bottom = first(sim, EntityKind::Bottom);
    step_with(sim, feed, vec![Contact::new(bottom, ball)])
}

// =============================================================================
// Helper Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_replays_in_order() {
        let feed = ContactFeed::default();
        let mut physics = ScriptedPhysics { feed: feed.clone() };
        let mut arena = Arena::new();
        let a = Contact::new(EntityId::new(0), EntityId::new(1));
        let b = Contact::new(EntityId::new(2), EntityId::new(3));

        feed.push(vec![a]);
        feed.push(vec![b]);

        assert_eq!(physics.step(&mut arena), vec![a]);
        assert_eq!(physics.step(&mut arena), vec![b]);
        assert!(physics.step(&mut arena).is_empty());
    }

    #[test]
    fn place_ball_sets_center() {
        let (mut sim, _) = scripted_sim();
        let ball = place_ball(&mut sim, Vec2::new(100.0, 200.0), Vec2::new(-5.0, 5.0));

        assert_eq!(sim.arena().center(ball), Some(Vec2::new(100.0, 200.0)));
        assert_eq!(sim.arena().linear_velocity(ball), Some(Vec2::new(-5.0, 5.0)));
    }

    #[test]
    fn scripted_sim_does_not_move_ball() {
        let (mut sim, _) = scripted_sim();
        let ball = first(&sim, EntityKind::Ball);
        let before = sim.arena().position(ball);

        sim.step();

        assert_eq!(sim.arena().position(ball), before);
    }
}
