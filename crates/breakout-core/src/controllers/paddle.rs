//! Paddle controller.
//!
//! Three states, driven by discrete commands from the input collaborator.
//! The last command received always wins; nothing is queued.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::EntityKind;

/// Input command for the paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleCommand {
    /// Start moving left.
    MoveLeft,
    /// Start moving right.
    MoveRight,
    /// Stop (fired on key release).
    StopMoving,
}

/// Commanded paddle motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleState {
    /// Not moving.
    #[default]
    Idle,
    /// Moving toward negative x.
    MovingLeft,
    /// Moving toward positive x.
    MovingRight,
}

/// Maps paddle commands to kinematic paddle velocity.
///
/// # Example
///
/// ```
/// use breakout_core::controllers::{PaddleController, PaddleState};
///
/// let mut paddle = PaddleController::new(5.0, 640.0);
/// paddle.left();
/// paddle.right();
/// assert_eq!(paddle.state(), PaddleState::MovingRight);
/// assert!((paddle.commanded_velocity() - 5.0).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddleController {
    state: PaddleState,
    speed: f32,
    board_width: f32,
}

impl PaddleController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(speed: f32, board_width: f32) -> Self {
        Self {
            state: PaddleState::Idle,
            speed,
            board_width,
        }
    }

    /// Commands leftward motion.
    pub fn left(&mut self) {
        self.state = PaddleState::MovingLeft;
    }

    /// Commands rightward motion.
    pub fn right(&mut self) {
        self.state = PaddleState::MovingRight;
    }

    /// Commands a stop.
    pub fn stop(&mut self) {
        self.state = PaddleState::Idle;
    }

    /// Dispatches a [`PaddleCommand`].
    pub fn apply_command(&mut self, command: PaddleCommand) {
        match command {
            PaddleCommand::MoveLeft => self.left(),
            PaddleCommand::MoveRight => self.right(),
            PaddleCommand::StopMoving => self.stop(),
        }
    }

    /// Current commanded state.
    #[must_use]
    pub const fn state(&self) -> PaddleState {
        self.state
    }

    /// Horizontal velocity for the current state, before board confinement.
    #[must_use]
    pub fn commanded_velocity(&self) -> f32 {
        match self.state {
            PaddleState::Idle => 0.0,
            PaddleState::MovingLeft => -self.speed,
            PaddleState::MovingRight => self.speed,
        }
    }

    /// Writes the commanded velocity onto every paddle body.
    ///
    /// The velocity is shortened so a paddle stops flush with the board edge
    /// instead of leaving the board. The commanded state is unchanged.
    pub fn update(&self, arena: &mut Arena) {
        let commanded = self.commanded_velocity();
        for id in arena.query_by_kind(EntityKind::Paddle) {
            let Some(position) = arena.position(id) else {
                continue;
            };
            let width = arena.shape(id).map_or(0.0, |shape| shape.extent().x);

            let room_left = position.x.max(0.0);
            let room_right = (self.board_width - (position.x + width)).max(0.0);
            let vx = commanded.clamp(-room_left, room_right);

            arena.set_linear_velocity(id, Vec2::new(vx, 0.0));
        }
    }
}
