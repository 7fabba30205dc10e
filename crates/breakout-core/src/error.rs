//! Error types.
//!
//! [`LevelError::NotFound`] is not a failure during play: the collision
//! resolver turns it into the game-won state. Every other variant is a real
//! fault surfaced to the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a [`Level`](crate::level::Level) for an index.
#[derive(Debug, Error)]
pub enum LevelError {
    /// No resource exists for this index.
    #[error("level {index} not found")]
    NotFound {
        /// Requested level index.
        index: u32,
    },

    /// The grid text is malformed.
    #[error("level {index} line {line}, column {column}: {reason}")]
    Parse {
        /// Level index being parsed.
        index: u32,
        /// 1-based line number.
        line: usize,
        /// 1-based column, or 0 when the fault concerns the whole line/grid.
        column: usize,
        /// What was wrong.
        reason: ParseReason,
    },

    /// The resource exists but could not be read.
    #[error("level {index} could not be read from {path}: {source}")]
    Io {
        /// Level index being read.
        index: u32,
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl LevelError {
    /// Returns `true` for the "no more levels" condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Why a level grid was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseReason {
    /// A character other than the brick or empty marker.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// A row whose width differs from the first row.
    #[error("row has {found} cells, expected {expected}")]
    RaggedRow {
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// An empty line between grid rows.
    #[error("blank line inside grid")]
    BlankLine,
    /// No rows at all.
    #[error("grid is empty")]
    Empty,
    /// Rows present but no brick marker anywhere.
    #[error("grid contains no bricks")]
    NoBricks,
}

/// Failure to load or validate a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The config text is not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Constraint that was violated.
        reason: &'static str,
    },
}

/// Failure to start a game.
#[derive(Debug, Error)]
pub enum GameError {
    /// The first level could not be loaded.
    #[error(transparent)]
    Level(#[from] LevelError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
