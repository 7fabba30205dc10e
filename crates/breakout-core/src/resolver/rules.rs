//! The three Breakout collision rules.

use glam::Vec2;
use tracing::{debug, info};

use super::{CollisionRule, KindPair, ResolveContext};
use crate::entity::{EntityId, EntityKind};
use crate::session::TickEvents;
use crate::spawn;

/// Ball hits brick: the brick is destroyed and scored.
///
/// Clearing the last brick advances to the next level immediately, before any
/// further contact is processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BallBrickRule;

impl CollisionRule for BallBrickRule {
    fn pair(&self) -> KindPair {
        KindPair::new(EntityKind::Ball, EntityKind::Brick)
    }

    fn resolve(&self, ctx: &mut ResolveContext<'_>, _ball: EntityId, brick: EntityId) {
        if ctx.arena.remove(brick).is_none() {
            return;
        }
        ctx.events |= TickEvents::BRICK_DESTROYED;

        let cleared = ctx.session.record_brick_destroyed(ctx.config.points_per_brick);
        debug!(
            brick = %brick,
            score = ctx.session.score(),
            remaining = ctx.session.bricks_remaining(),
            "brick destroyed"
        );

        if cleared {
            ctx.advance_level();
        }
    }
}

/// Ball hits paddle: horizontal direction follows which half was hit.
///
/// Right of the paddle centre sends the ball right, anything else sends it
/// left. Speed is unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BallPaddleRule;

impl CollisionRule for BallPaddleRule {
    fn pair(&self) -> KindPair {
        KindPair::new(EntityKind::Paddle, EntityKind::Ball)
    }

    fn resolve(&self, ctx: &mut ResolveContext<'_>, paddle: EntityId, ball: EntityId) {
        let (Some(ball_center), Some(paddle_center), Some(velocity)) = (
            ctx.arena.center(ball),
            ctx.arena.center(paddle),
            ctx.arena.linear_velocity(ball),
        ) else {
            return;
        };

        let speed_x = velocity.x.abs();
        let vx = if ball_center.x > paddle_center.x {
            speed_x
        } else {
            -speed_x
        };
        ctx.arena.set_linear_velocity(ball, Vec2::new(vx, velocity.y));
        ctx.events |= TickEvents::PADDLE_BOUNCE;
    }
}

/// Ball reaches the bottom: one life is lost.
///
/// With lives left a fresh ball is launched from the board centre; otherwise
/// the game is over.
#[derive(Debug, Clone, Copy, Default)]
pub struct BallBottomRule;

impl CollisionRule for BallBottomRule {
    fn pair(&self) -> KindPair {
        KindPair::new(EntityKind::Ball, EntityKind::Bottom)
    }

    fn resolve(&self, ctx: &mut ResolveContext<'_>, ball: EntityId, _bottom: EntityId) {
        if ctx.arena.remove(ball).is_none() {
            return;
        }
        ctx.events |= TickEvents::BALL_LOST;

        let lives = ctx.session.lose_life();
        if lives > 0 {
            debug!(lives, "ball lost");
            spawn::spawn_ball(ctx.arena, ctx.config);
            ctx.events |= TickEvents::BALL_SPAWNED;
        } else {
            ctx.events |= TickEvents::GAME_OVER;
            info!(score = ctx.session.score(), level = ctx.session.current_level(), "game over");
        }
    }
}
