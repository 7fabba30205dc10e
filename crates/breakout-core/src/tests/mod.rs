//! Test module for determinism and integration tests.
//!
//! These tests drive the full [`Simulation`](crate::simulation::Simulation)
//! rather than individual modules:
//! - **Determinism tests**: identical inputs produce identical games
//! - **Integration tests**: end-to-end gameplay scenarios
//! - **Helper functions**: scripted physics and board queries
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the simulation
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;

// Re-export for convenience
pub use helpers::*;
