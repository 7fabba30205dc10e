//! # Breakout Core
//!
//! Game-state and collision-resolution core for a single-player Breakout.
//!
//! This crate owns everything between the physics integrator and the
//! renderer: which entities exist, what happens when they touch, and the
//! score, lives and level the UI displays.
//!
//! ## Architecture
//!
//! - **Arena**: live entities tagged by kind, with sparse body/shape tables
//! - **Controllers**: paddle commands and the ball speed floor
//! - **Physics**: a [`physics::PhysicsBackend`] integrates bodies and reports
//!   collision-begin contacts
//! - **Resolver**: one [`resolver::CollisionRule`] per kind pair
//! - **Session**: score, lives, level; polled by the UI as a
//!   [`session::SessionView`]
//!
//! ## Usage
//!
//! ```
//! use breakout_core::{GameConfig, LevelLoader, PaddleCommand, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default(), LevelLoader::default())?;
//! sim.submit(PaddleCommand::MoveRight);
//! let report = sim.step();
//!
//! assert_eq!(report.tick, 0);
//! assert_eq!(sim.view().bricks_remaining, 30);
//! # Ok::<(), breakout_core::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod controllers;
pub mod entity;
pub mod error;
pub mod level;
pub mod physics;
pub mod resolver;
pub mod session;
pub mod simulation;
pub mod spawn;

pub use arena::Arena;
pub use config::GameConfig;
pub use controllers::PaddleCommand;
pub use entity::{EntityId, EntityKind};
pub use error::{ConfigError, GameError, LevelError};
pub use level::{DirectoryLevels, EmbeddedLevels, LevelLoader};
pub use session::{SessionView, TickEvents};
pub use simulation::{Simulation, TickReport};

#[cfg(test)]
mod tests;
