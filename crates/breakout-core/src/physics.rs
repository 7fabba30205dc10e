//! Physics collaborator interface and a reference integrator.
//!
//! The game core only needs three things from physics: bodies move by their
//! velocity each tick, dynamic bodies bounce off what they hit, and the core
//! is told when two entities *begin* touching. [`PhysicsBackend`] captures
//! that contract; velocities and positions are read and written through the
//! [`Arena`].
//!
//! [`SimplePhysics`] is a small fixed-step integrator good enough for a
//! single ball on a rectangular board:
//!
//! - Integration: `position += velocity * dt` for kinematic and dynamic bodies
//! - Narrow phase: every dynamic body against every other shaped entity
//!   (circle/box, box/box, circle/circle)
//! - Response: the dynamic body is pushed out along the contact normal and
//!   its normal velocity reflected, scaled by restitution. Kinematic and
//!   static bodies never respond.
//! - Events: a [`Contact`] is reported only on the first tick a pair
//!   overlaps.
//!
//! # Fixed Timestep
//!
//! Velocities are in units per tick, so the default step is `1.0`.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arena::Arena;
use crate::entity::{BodyType, BoundingShape, EntityId};

/// Default integration step: one tick.
pub const FIXED_DT: f32 = 1.0;

/// A collision-begin event between two entities.
///
/// The pair is unordered; `a < b` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Contact {
    a: EntityId,
    b: EntityId,
}

impl Contact {
    /// Creates a contact, ordering the ids.
    #[must_use]
    pub fn new(first: EntityId, second: EntityId) -> Self {
        if first <= second {
            Self {
                a: first,
                b: second,
            }
        } else {
            Self {
                a: second,
                b: first,
            }
        }
    }

    /// Lower id of the pair.
    #[must_use]
    pub const fn a(&self) -> EntityId {
        self.a
    }

    /// Higher id of the pair.
    #[must_use]
    pub const fn b(&self) -> EntityId {
        self.b
    }

    /// Both ids.
    #[must_use]
    pub const fn pair(&self) -> (EntityId, EntityId) {
        (self.a, self.b)
    }
}

/// The physics collaborator.
///
/// Implementations advance every body one fixed step and return the
/// collision-begin events generated during that step.
pub trait PhysicsBackend: Send {
    /// Advances the world one step.
    fn step(&mut self, arena: &mut Arena) -> Vec<Contact>;
}

/// Contact normal (pointing toward the dynamic body) and penetration depth.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Manifold {
    normal: Vec2,
    depth: f32,
}

/// Reference fixed-step integrator.
///
/// # Example
///
/// ```
/// use breakout_core::arena::Arena;
/// use breakout_core::entity::{BoundingShape, EntityKind, PhysicsBody, SpawnState};
/// use breakout_core::physics::{PhysicsBackend, SimplePhysics};
/// use glam::Vec2;
///
/// let mut arena = Arena::new();
/// let ball = arena.spawn(
///     EntityKind::Ball,
///     SpawnState::at(Vec2::ZERO)
///         .with_body(PhysicsBody::dynamic(Vec2::new(5.0, 0.0), 1.0, 0.3))
///         .with_shape(BoundingShape::Circle { radius: 12.0 }),
/// );
///
/// let mut physics = SimplePhysics::new();
/// assert!(physics.step(&mut arena).is_empty());
/// assert_eq!(arena.position(ball), Some(Vec2::new(5.0, 0.0)));
/// ```
#[derive(Debug, Clone)]
pub struct SimplePhysics {
    dt: f32,
    /// Pairs overlapping at the end of the previous step.
    touching: BTreeSet<Contact>,
}

impl Default for SimplePhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplePhysics {
    /// Creates an integrator with the default step.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dt(FIXED_DT)
    }

    /// Creates an integrator with a custom step.
    #[must_use]
    pub fn with_dt(dt: f32) -> Self {
        Self {
            dt,
            touching: BTreeSet::new(),
        }
    }

    /// The integration step.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    fn integrate(&self, arena: &mut Arena) {
        let movers: Vec<(EntityId, Vec2)> = arena
            .bodies()
            .filter(|(_, body)| body.is_moving() && body.velocity != Vec2::ZERO)
            .map(|(id, body)| (id, body.velocity))
            .collect();

        for (id, velocity) in movers {
            if let Some(position) = arena.position(id) {
                arena.set_position(id, position + velocity * self.dt);
            }
        }
    }

    /// Pushes `dynamic` out of the contact and reflects its normal velocity.
    fn respond(arena: &mut Arena, dynamic: EntityId, manifold: Manifold) {
        if let Some(position) = arena.position(dynamic) {
            arena.set_position(dynamic, position + manifold.normal * manifold.depth);
        }
        if let Some(body) = arena.body_mut(dynamic) {
            let approach = body.velocity.dot(manifold.normal);
            if approach < 0.0 {
                body.velocity -= manifold.normal * approach * (1.0 + body.restitution);
            }
        }
    }
}

impl PhysicsBackend for SimplePhysics {
    fn step(&mut self, arena: &mut Arena) -> Vec<Contact> {
        self.integrate(arena);

        let dynamic: Vec<EntityId> = arena
            .bodies()
            .filter(|(id, body)| body.body_type == BodyType::Dynamic && arena.shape(*id).is_some())
            .map(|(id, _)| id)
            .collect();
        let shaped: Vec<EntityId> = arena
            .entity_ids_sorted()
            .filter(|id| arena.shape(*id).is_some())
            .collect();

        let mut touching = BTreeSet::new();
        let mut began = Vec::new();

        for &mover in &dynamic {
            // Overlaps are gathered before any push-out so a ball straddling
            // two bricks reports both.
            let hits: Vec<(EntityId, Manifold)> = shaped
                .iter()
                .filter(|&&other| other != mover)
                .filter_map(|&other| overlap(arena, mover, other).map(|m| (other, m)))
                .collect();

            for (other, manifold) in hits {
                let contact = Contact::new(mover, other);
                if !touching.insert(contact) {
                    // Dynamic/dynamic pair already handled from the other side.
                    continue;
                }
                if !self.touching.contains(&contact) {
                    trace!(a = %contact.a(), b = %contact.b(), "contact began");
                    began.push(contact);
                }

                let other_is_dynamic = arena
                    .body(other)
                    .is_some_and(|body| body.body_type == BodyType::Dynamic);
                if !other_is_dynamic {
                    Self::respond(arena, mover, manifold);
                }
            }
        }

        self.touching = touching;
        began
    }
}

/// Overlap of `mover` against `other`, normal pointing toward `mover`.
fn overlap(arena: &Arena, mover: EntityId, other: EntityId) -> Option<Manifold> {
    let mover_shape = *arena.shape(mover)?;
    let other_shape = *arena.shape(other)?;
    let mover_pos = arena.position(mover)?;
    let other_pos = arena.position(other)?;

    match (mover_shape, other_shape) {
        (BoundingShape::Circle { radius }, BoundingShape::Box { .. }) => {
            let (min, max) = other_shape.aabb(other_pos);
            circle_box(mover_shape.center(mover_pos), radius, min, max)
        }
        (BoundingShape::Box { .. }, BoundingShape::Circle { radius }) => {
            let (min, max) = mover_shape.aabb(mover_pos);
            circle_box(other_shape.center(other_pos), radius, min, max).map(|m| Manifold {
                normal: -m.normal,
                depth: m.depth,
            })
        }
        (BoundingShape::Circle { radius: ra }, BoundingShape::Circle { radius: rb }) => {
            circle_circle(
                mover_shape.center(mover_pos),
                ra,
                other_shape.center(other_pos),
                rb,
            )
        }
        (BoundingShape::Box { .. }, BoundingShape::Box { .. }) => {
            box_box(mover_shape.aabb(mover_pos), other_shape.aabb(other_pos))
        }
    }
}

fn circle_box(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> Option<Manifold> {
    let closest = center.clamp(min, max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(Manifold {
            normal: delta / dist,
            depth: radius - dist,
        });
    }

    // Center inside the box: leave through the nearest face.
    let faces = [
        (center.x - min.x, Vec2::NEG_X),
        (max.x - center.x, Vec2::X),
        (center.y - min.y, Vec2::NEG_Y),
        (max.y - center.y, Vec2::Y),
    ];
    let (distance, normal) = faces
        .into_iter()
        .min_by(|l, r| l.0.total_cmp(&r.0))
        .unwrap_or((0.0, Vec2::NEG_Y));
    Some(Manifold {
        normal,
        depth: distance + radius,
    })
}

fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Manifold> {
    let delta = a - b;
    let reach = ra + rb;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { delta / dist } else { Vec2::NEG_Y };
    Some(Manifold {
        normal,
        depth: reach - dist,
    })
}

fn box_box(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> Option<Manifold> {
    let overlap_x = a.1.x.min(b.1.x) - a.0.x.max(b.0.x);
    let overlap_y = a.1.y.min(b.1.y) - a.0.y.max(b.0.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let a_center = (a.0 + a.1) * 0.5;
    let b_center = (b.0 + b.1) * 0.5;
    if overlap_x < overlap_y {
        let sign = if a_center.x < b_center.x { -1.0 } else { 1.0 };
        Some(Manifold {
            normal: Vec2::new(sign, 0.0),
            depth: overlap_x,
        })
    } else {
        let sign = if a_center.y < b_center.y { -1.0 } else { 1.0 };
        Some(Manifold {
            normal: Vec2::new(0.0, sign),
            depth: overlap_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, PhysicsBody, SpawnState};

    fn spawn_ball(arena: &mut Arena, position: Vec2, velocity: Vec2) -> EntityId {
        arena.spawn(
            EntityKind::Ball,
            SpawnState::at(position)
                .with_body(PhysicsBody::dynamic(velocity, 1.0, 0.3))
                .with_shape(BoundingShape::Circle { radius: 12.0 }),
        )
    }

    fn spawn_block(arena: &mut Arena, kind: EntityKind, position: Vec2, size: Vec2) -> EntityId {
        arena.spawn(
            kind,
            SpawnState::at(position)
                .with_body(PhysicsBody::fixed())
                .with_shape(BoundingShape::Box { size }),
        )
    }

    const BRICK: Vec2 = Vec2::new(64.0, 32.0);

    mod contact_tests {
        use super::*;

        #[test]
        fn contact_orders_ids() {
            let c = Contact::new(EntityId::new(9), EntityId::new(2));
            assert_eq!(c.pair(), (EntityId::new(2), EntityId::new(9)));
            assert_eq!(c, Contact::new(EntityId::new(2), EntityId::new(9)));
        }
    }

    mod integration_tests {
        use super::*;

        #[test]
        fn default_dt_is_one_tick() {
            assert!((SimplePhysics::new().dt() - 1.0).abs() < f32::EPSILON);
            assert!((SimplePhysics::default().dt() - FIXED_DT).abs() < f32::EPSILON);
        }

        #[test]
        fn default_integrator_moves_bodies() {
            let mut arena = Arena::new();
            let ball = spawn_ball(&mut arena, Vec2::ZERO, Vec2::new(5.0, 0.0));

            SimplePhysics::default().step(&mut arena);

            assert_eq!(arena.position(ball), Some(Vec2::new(5.0, 0.0)));
        }

        #[test]
        fn dynamic_and_kinematic_bodies_move() {
            let mut arena = Arena::new();
            let ball = spawn_ball(&mut arena, Vec2::new(100.0, 100.0), Vec2::new(5.0, -5.0));
            let paddle = arena.spawn(
                EntityKind::Paddle,
                SpawnState::at(Vec2::new(200.0, 676.0))
                    .with_body(PhysicsBody::kinematic()),
            );
            arena.set_linear_velocity(paddle, Vec2::new(-5.0, 0.0));

            SimplePhysics::new().step(&mut arena);

            assert_eq!(arena.position(ball), Some(Vec2::new(105.0, 95.0)));
            assert_eq!(arena.position(paddle), Some(Vec2::new(195.0, 676.0)));
        }

        #[test]
        fn static_bodies_stay_put() {
            let mut arena = Arena::new();
            let brick = spawn_block(&mut arena, EntityKind::Brick, Vec2::new(0.0, 30.0), BRICK);
            arena.set_linear_velocity(brick, Vec2::new(3.0, 3.0));

            SimplePhysics::new().step(&mut arena);

            assert_eq!(arena.position(brick), Some(Vec2::new(0.0, 30.0)));
        }

        #[test]
        fn custom_dt_scales_motion() {
            let mut arena = Arena::new();
            let ball = spawn_ball(&mut arena, Vec2::ZERO, Vec2::new(10.0, 0.0));
            SimplePhysics::with_dt(0.5).step(&mut arena);
            assert_eq!(arena.position(ball), Some(Vec2::new(5.0, 0.0)));
        }
    }

    mod collision_tests {
        use super::*;

        #[test]
        fn ball_bounces_off_brick_above() {
            let mut arena = Arena::new();
            let brick = spawn_block(&mut arena, EntityKind::Brick, Vec2::new(0.0, 30.0), BRICK);
            // Ball top edge at y=64, moving up 5 -> overlaps brick bottom (y=62).
            let ball = spawn_ball(&mut arena, Vec2::new(20.0, 64.0), Vec2::new(5.0, -5.0));

            let contacts = SimplePhysics::new().step(&mut arena);

            assert_eq!(contacts, vec![Contact::new(ball, brick)]);
            let velocity = arena.linear_velocity(ball).unwrap();
            assert!((velocity.x - 5.0).abs() < 1e-4);
            assert!((velocity.y - 5.0).abs() < 1e-4);
            // Pushed back out below the brick.
            assert!(arena.position(ball).unwrap().y >= 62.0 - 1e-4);
        }

        #[test]
        fn begin_event_fires_once_per_overlap() {
            let mut arena = Arena::new();
            // Two resting balls overlap; neither responds to the other, so the
            // overlap persists across steps.
            let a = spawn_ball(&mut arena, Vec2::new(0.0, 0.0), Vec2::ZERO);
            let b = spawn_ball(&mut arena, Vec2::new(10.0, 0.0), Vec2::ZERO);

            let mut physics = SimplePhysics::new();
            assert_eq!(physics.step(&mut arena), vec![Contact::new(a, b)]);
            assert!(physics.step(&mut arena).is_empty());

            arena.set_position(b, Vec2::new(100.0, 0.0));
            assert!(physics.step(&mut arena).is_empty());

            arena.set_position(b, Vec2::new(10.0, 0.0));
            assert_eq!(physics.step(&mut arena), vec![Contact::new(a, b)]);
        }

        #[test]
        fn no_event_without_overlap() {
            let mut arena = Arena::new();
            spawn_block(&mut arena, EntityKind::Brick, Vec2::new(0.0, 30.0), BRICK);
            spawn_ball(&mut arena, Vec2::new(300.0, 300.0), Vec2::new(5.0, -5.0));

            assert!(SimplePhysics::new().step(&mut arena).is_empty());
        }

        #[test]
        fn two_bricks_in_one_step() {
            let mut arena = Arena::new();
            let left = spawn_block(&mut arena, EntityKind::Brick, Vec2::new(0.0, 30.0), BRICK);
            let right = spawn_block(&mut arena, EntityKind::Brick, Vec2::new(64.0, 30.0), BRICK);
            // Ball centred on the seam between the two bricks.
            let ball = spawn_ball(&mut arena, Vec2::new(52.0, 64.0), Vec2::new(0.0, -5.0));

            let contacts = SimplePhysics::new().step(&mut arena);

            assert_eq!(contacts.len(), 2);
            assert!(contacts.contains(&Contact::new(ball, left)));
            assert!(contacts.contains(&Contact::new(ball, right)));
            // Reflected once, not twice.
            assert!(arena.linear_velocity(ball).unwrap().y > 0.0);
        }

        #[test]
        fn kinematic_paddle_is_not_pushed() {
            let mut arena = Arena::new();
            let paddle = arena.spawn(
                EntityKind::Paddle,
                SpawnState::at(Vec2::new(256.0, 676.0))
                    .with_body(PhysicsBody::kinematic())
                    .with_shape(BoundingShape::Box {
                        size: Vec2::new(128.0, 24.0),
                    }),
            );
            let ball = spawn_ball(&mut arena, Vec2::new(300.0, 650.0), Vec2::new(5.0, 5.0));

            let contacts = SimplePhysics::new().step(&mut arena);

            assert_eq!(contacts, vec![Contact::new(ball, paddle)]);
            assert_eq!(arena.position(paddle), Some(Vec2::new(256.0, 676.0)));
            assert!(arena.linear_velocity(ball).unwrap().y < 0.0);
        }
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn circle_box_from_outside() {
            let m = circle_box(
                Vec2::new(50.0, 70.0),
                12.0,
                Vec2::new(0.0, 30.0),
                Vec2::new(64.0, 62.0),
            )
            .unwrap();
            assert_eq!(m.normal, Vec2::Y);
            assert!((m.depth - 4.0).abs() < 1e-4);
        }

        #[test]
        fn circle_box_touching_is_not_overlap() {
            assert!(circle_box(
                Vec2::new(50.0, 74.0),
                12.0,
                Vec2::new(0.0, 30.0),
                Vec2::new(64.0, 62.0)
            )
            .is_none());
        }

        #[test]
        fn circle_box_from_inside_uses_nearest_face() {
            let size = Vec2::new(100.0, 100.0);
            let m = circle_box(Vec2::new(2.0, 50.0), 12.0, Vec2::ZERO, size).unwrap();
            assert_eq!(m.normal, Vec2::NEG_X);
            assert!((m.depth - 14.0).abs() < 1e-4);
        }

        #[test]
        fn circle_circle_overlap() {
            let m = circle_circle(Vec2::new(0.0, 0.0), 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
            assert_eq!(m.normal, Vec2::NEG_X);
            assert!((m.depth - 5.0).abs() < 1e-4);
            assert!(circle_circle(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0).is_none());
        }

        #[test]
        fn box_box_picks_shallow_axis() {
            let m = box_box(
                (Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
                (Vec2::new(8.0, 0.0), Vec2::new(20.0, 10.0)),
            )
            .unwrap();
            assert_eq!(m.normal, Vec2::NEG_X);
            assert!((m.depth - 2.0).abs() < 1e-4);
        }
    }
}
