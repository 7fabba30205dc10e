//! Entity factories.
//!
//! Every entity the game creates goes through one of these functions so that
//! component layout (body type, shape, fixture parameters) is decided in a
//! single place. Positions are top-left corners.

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::{BoundingShape, EntityId, EntityKind, PhysicsBody, SpawnState};
use crate::level::Level;

/// Ids of the four board boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Left wall.
    pub left: EntityId,
    /// Right wall.
    pub right: EntityId,
    /// Top wall.
    pub top: EntityId,
    /// Kill zone below the board.
    pub bottom: EntityId,
}

fn static_box(position: Vec2, size: Vec2) -> SpawnState {
    SpawnState::at(position)
        .with_body(PhysicsBody::fixed())
        .with_shape(BoundingShape::Box { size })
}

/// Spawns the three solid walls and the bottom kill zone.
///
/// The walls extend `wall_thickness` outward from the board on the left,
/// right and top, overlapping at the corners. The bottom spans the board
/// width directly below it.
pub fn spawn_bounds(arena: &mut Arena, config: &GameConfig) -> Bounds {
    let w = config.board_width;
    let h = config.board_height;
    let t = config.wall_thickness;

    let left = arena.spawn(
        EntityKind::Wall,
        static_box(Vec2::new(-t, -t), Vec2::new(t, h + 2.0 * t)),
    );
    let right = arena.spawn(
        EntityKind::Wall,
        static_box(Vec2::new(w, -t), Vec2::new(t, h + 2.0 * t)),
    );
    let top = arena.spawn(
        EntityKind::Wall,
        static_box(Vec2::new(-t, -t), Vec2::new(w + 2.0 * t, t)),
    );
    let bottom = arena.spawn(
        EntityKind::Bottom,
        static_box(Vec2::new(0.0, h), Vec2::new(w, t)),
    );

    Bounds {
        left,
        right,
        top,
        bottom,
    }
}

/// Spawns the paddle centred horizontally, flush with the board bottom.
pub fn spawn_paddle(arena: &mut Arena, config: &GameConfig) -> EntityId {
    let size = config.paddle_size;
    let position = Vec2::new(
        config.board_width / 2.0 - size.x / 2.0,
        config.board_height - config.paddle_offset,
    );
    arena.spawn(
        EntityKind::Paddle,
        SpawnState::at(position)
            .with_body(PhysicsBody::kinematic())
            .with_shape(BoundingShape::Box { size }),
    )
}

/// Spawns a ball at the board centre with the launch velocity.
pub fn spawn_ball(arena: &mut Arena, config: &GameConfig) -> EntityId {
    let r = config.ball_radius;
    let position = config.board_center() - Vec2::splat(r);
    let id = arena.spawn(
        EntityKind::Ball,
        SpawnState::at(position)
            .with_body(PhysicsBody::dynamic(
                config.ball_launch_velocity,
                config.ball_restitution,
                config.ball_density,
            ))
            .with_shape(BoundingShape::Circle { radius: r }),
    );
    debug!(entity = %id, ?position, "ball spawned");
    id
}

/// Spawns one static brick per brick cell of `level`. Returns the count.
pub fn spawn_bricks(arena: &mut Arena, level: &Level, config: &GameConfig) -> u32 {
    let mut spawned = 0u32;
    for position in level.brick_positions(config.brick_cell, config.brick_top_margin) {
        arena.spawn(EntityKind::Brick, static_box(position, config.brick_size));
        spawned += 1;
    }
    debug!(level = level.index(), bricks = spawned, "bricks spawned");
    spawned
}
