//! Game session bookkeeping: score, lives, level and bricks remaining.
//!
//! [`GameSession`] is plain state. Only the collision resolver and the level
//! transition path mutate it; the UI polls a [`SessionView`] once per frame.
//!
//! # Terminal states
//!
//! [`SessionState::Won`] and [`SessionState::Over`] are one-way. Once either
//! is reached every mutator becomes a no-op.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Normal play.
    #[default]
    Playing,
    /// All levels cleared.
    Won,
    /// Out of lives.
    Over,
}

impl SessionState {
    /// Returns `true` for `Won` or `Over`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

bitflags! {
    /// Things that happened during a single tick.
    ///
    /// Intended for UI and effect collaborators; gameplay never branches on
    /// these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TickEvents: u16 {
        /// At least one brick was destroyed.
        const BRICK_DESTROYED = 1 << 0;
        /// The ball bounced off the paddle.
        const PADDLE_BOUNCE = 1 << 1;
        /// The ball reached the bottom.
        const BALL_LOST = 1 << 2;
        /// A new ball was spawned.
        const BALL_SPAWNED = 1 << 3;
        /// The next level was loaded.
        const LEVEL_ADVANCED = 1 << 4;
        /// A level failed to load and the previous level was replayed.
        const LEVEL_REJECTED = 1 << 5;
        /// The session entered the won state.
        const GAME_WON = 1 << 6;
        /// The session entered the game-over state.
        const GAME_OVER = 1 << 7;
    }
}

impl Default for TickEvents {
    fn default() -> Self {
        Self::empty()
    }
}

/// Score, lives and level progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    score: u64,
    lives_remaining: u32,
    current_level: u32,
    bricks_remaining: u32,
    state: SessionState,
}

impl GameSession {
    /// A fresh session on level 0 with no bricks counted yet.
    #[must_use]
    pub const fn new(starting_lives: u32) -> Self {
        Self {
            score: 0,
            lives_remaining: starting_lives,
            current_level: 0,
            bricks_remaining: 0,
            state: SessionState::Playing,
        }
    }

    /// Records that `level` is now active with `bricks` bricks.
    pub fn begin_level(&mut self, level: u32, bricks: u32) {
        if self.state.is_terminal() {
            return;
        }
        self.current_level = level;
        self.bricks_remaining = bricks;
    }

    /// Awards `points` for one destroyed brick and decrements the count.
    ///
    /// Returns `true` when this was the last brick of the level.
    pub fn record_brick_destroyed(&mut self, points: u64) -> bool {
        if self.state.is_terminal() || self.bricks_remaining == 0 {
            return false;
        }
        self.score = self.score.saturating_add(points);
        self.bricks_remaining -= 1;
        self.bricks_remaining == 0
    }

    /// Takes one life. Returns the lives left.
    ///
    /// Reaching zero moves the session to [`SessionState::Over`].
    pub fn lose_life(&mut self) -> u32 {
        if self.state.is_terminal() {
            return self.lives_remaining;
        }
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        if self.lives_remaining == 0 {
            self.state = SessionState::Over;
        }
        self.lives_remaining
    }

    /// Moves the session to [`SessionState::Won`].
    pub fn mark_won(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Won;
        }
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Lives left.
    #[must_use]
    pub const fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    /// Active level index. After a win this is one past the last level.
    #[must_use]
    pub const fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Bricks left on the active level.
    #[must_use]
    pub const fn bricks_remaining(&self) -> u32 {
        self.bricks_remaining
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once won or over.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Read-only snapshot for the UI.
    #[must_use]
    pub const fn view(&self) -> SessionView {
        SessionView {
            score: self.score,
            lives_remaining: self.lives_remaining,
            bricks_remaining: self.bricks_remaining,
            current_level: self.current_level,
            game_won: matches!(self.state, SessionState::Won),
            game_over: matches!(self.state, SessionState::Over),
        }
    }
}

/// Values the UI renders as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Current score.
    pub score: u64,
    /// Lives left.
    pub lives_remaining: u32,
    /// Bricks left on the active level.
    pub bricks_remaining: u32,
    /// Active level index.
    pub current_level: u32,
    /// All levels cleared.
    pub game_won: bool,
    /// Out of lives.
    pub game_over: bool,
}
