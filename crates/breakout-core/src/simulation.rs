//! Simulation module with the fixed per-tick execution loop.
//!
//! The `Simulation` struct owns the whole game and advances it one tick at a
//! time through six phases:
//!
//! 1. **INPUT**: Take the pending paddle command, write paddle velocity
//! 2. **PHYSICS**: Integrate bodies, collect collision-begin contacts
//! 3. **RESOLUTION**: Apply game rules to the contacts in delivery order
//! 4. **CLAMP**: Lift ball velocity components to the minimum speed
//! 5. **SAFETY**: Respawn the ball if it vanished while lives remain
//! 6. **APPLY**: Advance the tick counter, return a [`TickReport`]
//!
//! # Determinism
//!
//! Entities are iterated in id order and every phase is single-threaded, so
//! the same command sequence always produces the same session.
//!
//! # Example
//!
//! ```
//! use breakout_core::config::GameConfig;
//! use breakout_core::controllers::PaddleCommand;
//! use breakout_core::level::LevelLoader;
//! use breakout_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(GameConfig::default(), LevelLoader::default()).unwrap();
//!
//! sim.submit(PaddleCommand::MoveLeft);
//! for _ in 0..10 {
//!     sim.step();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.view().lives_remaining, 3);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::controllers::{BallController, PaddleCommand, PaddleController, PaddleState};
use crate::entity::EntityKind;
use crate::error::{GameError, LevelError};
use crate::level::{Level, LevelLoader};
use crate::physics::{PhysicsBackend, SimplePhysics};
use crate::resolver::{CollisionResolver, ResolveContext};
use crate::session::{GameSession, SessionView, TickEvents};
use crate::spawn;

// =============================================================================
// TickReport
// =============================================================================

/// What happened during one [`Simulation::step`].
#[derive(Debug, Default, Serialize)]
pub struct TickReport {
    /// The tick that was executed.
    pub tick: u64,
    /// Gameplay events raised this tick.
    pub events: TickEvents,
    /// Collision-begin contacts delivered by physics.
    pub contacts: usize,
    /// Set when a level advance was rejected this tick.
    #[serde(skip)]
    pub level_error: Option<LevelError>,
}

impl TickReport {
    /// Returns `true` if nothing happened.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.level_error.is_none()
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// The game orchestrator.
///
/// `Simulation` owns:
/// - The arena of live entities
/// - The session (score, lives, level)
/// - The active level and the loader that supplies the next one
/// - Paddle and ball controllers
/// - The physics backend and the collision resolver
///
/// Input arrives through [`Simulation::submit`] and is applied at the start
/// of the next tick. Only the most recent command is kept.
pub struct Simulation {
    arena: Arena,
    session: GameSession,
    config: GameConfig,
    levels: LevelLoader,
    level: Level,
    paddle: PaddleController,
    ball: BallController,
    physics: Box<dyn PhysicsBackend>,
    resolver: CollisionResolver,
    pending: Option<PaddleCommand>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("session", &self.session)
            .field("level", &self.level.index())
            .field("paddle", &self.paddle)
            .field("ball", &self.ball)
            .field("resolver", &self.resolver)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Builds a game on level 0 with the reference physics backend.
    ///
    /// Spawns the board bounds, the paddle, one ball and level 0's bricks.
    ///
    /// # Errors
    ///
    /// [`GameError::Config`] if `config` fails validation;
    /// [`GameError::Level`] if level 0 cannot be loaded, including when it
    /// does not exist.
    pub fn new(config: GameConfig, levels: LevelLoader) -> Result<Self, GameError> {
        config.validate()?;
        let level = levels.load(0)?;

        let mut arena = Arena::new();
        spawn::spawn_bounds(&mut arena, &config);
        spawn::spawn_paddle(&mut arena, &config);
        spawn::spawn_ball(&mut arena, &config);
        let bricks = spawn::spawn_bricks(&mut arena, &level, &config);

        let mut session = GameSession::new(config.starting_lives);
        session.begin_level(0, bricks);

        info!(bricks, lives = config.starting_lives, "game started");

        Ok(Self {
            arena,
            session,
            paddle: PaddleController::new(config.paddle_speed, config.board_width),
            ball: BallController::new(config.ball_min_speed),
            config,
            levels,
            level,
            physics: Box::new(SimplePhysics::new()),
            resolver: CollisionResolver::new(),
            pending: None,
        })
    }

    /// Replaces the physics backend.
    #[must_use]
    pub fn with_physics(mut self, physics: Box<dyn PhysicsBackend>) -> Self {
        self.physics = physics;
        self
    }

    /// Replaces the collision resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: CollisionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Queues a paddle command for the next tick, replacing any pending one.
    pub fn submit(&mut self, command: PaddleCommand) {
        self.pending = Some(command);
    }

    /// Executes one tick.
    ///
    /// Once the session is won or over this does nothing and returns an
    /// empty report for the current tick.
    pub fn step(&mut self) -> TickReport {
        let tick = self.arena.current_tick();
        if self.session.is_terminal() {
            return TickReport {
                tick,
                ..TickReport::default()
            };
        }

        // PHASE 1: INPUT
        if let Some(command) = self.pending.take() {
            self.paddle.apply_command(command);
        }
        self.paddle.update(&mut self.arena);

        // PHASE 2: PHYSICS
        let contacts = self.physics.step(&mut self.arena);

        // PHASE 3: RESOLUTION
        let mut ctx = ResolveContext::new(
            &mut self.arena,
            &mut self.session,
            &self.levels,
            &self.config,
            &mut self.level,
        );
        self.resolver.resolve(&contacts, &mut ctx);
        let mut events = ctx.events;
        let level_error = ctx.level_error;

        // PHASE 4: CLAMP
        self.ball.update(&mut self.arena);

        // PHASE 5: SAFETY
        if self.ensure_ball() {
            events |= TickEvents::BALL_SPAWNED;
        }

        // PHASE 6: APPLY
        self.arena.advance_tick();

        TickReport {
            tick,
            events,
            contacts: contacts.len(),
            level_error,
        }
    }

    /// Spawns a ball if none exists and the game can continue.
    fn ensure_ball(&mut self) -> bool {
        if self.session.is_terminal()
            || self.session.lives_remaining() == 0
            || self.arena.count_of_kind(EntityKind::Ball) > 0
        {
            return false;
        }
        warn!(tick = self.arena.current_tick(), "no ball in play, respawning");
        spawn::spawn_ball(&mut self.arena, &self.config);
        true
    }

    /// Runs up to `ticks` steps, stopping early on a terminal state.
    ///
    /// Returns how many steps ran.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < ticks && !self.session.is_terminal() {
            self.step();
            ran += 1;
        }
        debug!(ran, tick = self.tick(), "run finished");
        ran
    }

    /// Read-only arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable arena, for test setup and tools.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Session state.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// UI snapshot of the session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The level on the board.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Commanded paddle state.
    #[must_use]
    pub fn paddle_state(&self) -> PaddleState {
        self.paddle.state()
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Returns `true` once the game is won or over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_terminal()
    }
}

// =============================================================================
// Tests
// =============================================================================
