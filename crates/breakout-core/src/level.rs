//! Level loading.
//!
//! A level is a plain-text grid, one row per line. `1` marks a brick cell and
//! `0` an empty one. Grid cell `(row, column)` maps to the brick's top-left
//! corner at `x = column * cell.x`, `y = top_margin + row * cell.y`.
//!
//! Levels are keyed by index and named `breakout{index}`. A [`LevelSource`]
//! supplies the text; [`LevelLoader`] parses it. Running out of levels is
//! reported as [`LevelError::NotFound`], which the game treats as a win.
//!
//! ```
//! use breakout_core::level::{EmbeddedLevels, LevelLoader};
//!
//! let loader = LevelLoader::new(EmbeddedLevels);
//! let level = loader.load(0).unwrap();
//! assert_eq!(level.brick_count(), 30);
//! assert!(loader.load(99).unwrap_err().is_not_found());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LevelError, ParseReason};

/// Grid character denoting a brick.
pub const BRICK_MARKER: char = '1';
/// Grid character denoting an empty cell.
pub const EMPTY_MARKER: char = '0';

/// Resource name for a level index.
#[must_use]
pub fn resource_name(index: u32) -> String {
    format!("breakout{index}")
}

/// A brick's position in the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Zero-based row, top first.
    pub row: u32,
    /// Zero-based column, left first.
    pub column: u32,
}

impl GridCell {
    /// World-space top-left corner of this cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_position(self, cell: Vec2, top_margin: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * cell.x,
            top_margin + self.row as f32 * cell.y,
        )
    }
}

/// A parsed level. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    index: u32,
    rows: u32,
    columns: u32,
    bricks: Vec<GridCell>,
}

impl Level {
    /// Parses grid text for level `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Parse`] on unexpected characters, ragged rows,
    /// blank lines inside the grid, an empty grid, or a grid with no bricks.
    pub fn parse(index: u32, text: &str) -> Result<Self, LevelError> {
        let parse_error = |line: usize, column: usize, reason: ParseReason| LevelError::Parse {
            index,
            line,
            column,
            reason,
        };

        let lines: Vec<&str> = text.lines().collect();
        let used = lines
            .iter()
            .rposition(|line| !line.trim_end().is_empty())
            .map_or(0, |last| last + 1);
        if used == 0 {
            return Err(parse_error(1, 0, ParseReason::Empty));
        }

        let mut bricks = Vec::new();
        let mut width: Option<usize> = None;

        for (row, line) in lines[..used].iter().enumerate() {
            let line_no = row + 1;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                return Err(parse_error(line_no, 0, ParseReason::BlankLine));
            }

            let mut cells = 0;
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    BRICK_MARKER => bricks.push(GridCell {
                        row: to_u32(row),
                        column: to_u32(col),
                    }),
                    EMPTY_MARKER => {}
                    other => {
                        let reason = ParseReason::UnexpectedChar(other);
                        return Err(parse_error(line_no, col + 1, reason));
                    }
                }
                cells += 1;
            }

            match width {
                None => width = Some(cells),
                Some(expected) if expected != cells => {
                    return Err(parse_error(
                        line_no,
                        0,
                        ParseReason::RaggedRow {
                            expected,
                            found: cells,
                        },
                    ));
                }
                Some(_) => {}
            }
        }

        if bricks.is_empty() {
            return Err(parse_error(1, 0, ParseReason::NoBricks));
        }

        Ok(Self {
            index,
            rows: to_u32(used),
            columns: to_u32(width.unwrap_or(0)),
            bricks,
        })
    }

    /// Level index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Brick cells in row-major order.
    #[must_use]
    pub fn bricks(&self) -> &[GridCell] {
        &self.bricks
    }

    /// Number of bricks in the level.
    #[must_use]
    pub fn brick_count(&self) -> usize {
        self.bricks.len()
    }

    /// World positions of all bricks, row-major.
    #[must_use]
    pub fn brick_positions(&self, cell: Vec2, top_margin: f32) -> Vec<Vec2> {
        self.bricks
            .iter()
            .map(|brick| brick.world_position(cell, top_margin))
            .collect()
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

// =============================================================================
// Sources
// =============================================================================

/// Supplies raw level text by index.
pub trait LevelSource: Send + Sync {
    /// Returns the grid text for `index`.
    ///
    /// # Errors
    ///
    /// [`LevelError::NotFound`] when no level exists for `index`;
    /// [`LevelError::Io`] when it exists but cannot be read.
    fn read(&self, index: u32) -> Result<Cow<'_, str>, LevelError>;
}

/// Levels compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLevels;

impl EmbeddedLevels {
    const LEVELS: [&'static str; 3] = [
        include_str!("../levels/breakout0.txt"),
        include_str!("../levels/breakout1.txt"),
        include_str!("../levels/breakout2.txt"),
    ];

    /// Number of embedded levels.
    #[must_use]
    pub const fn count() -> usize {
        Self::LEVELS.len()
    }
}

impl LevelSource for EmbeddedLevels {
    fn read(&self, index: u32) -> Result<Cow<'_, str>, LevelError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::LEVELS.get(i))
            .map(|text| Cow::Borrowed(*text))
            .ok_or(LevelError::NotFound { index })
    }
}

/// Levels read from `<root>/breakout{index}.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryLevels {
    root: PathBuf,
}

impl DirectoryLevels {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file for `index`.
    #[must_use]
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.root.join(format!("{}.txt", resource_name(index)))
    }
}

impl LevelSource for DirectoryLevels {
    fn read(&self, index: u32) -> Result<Cow<'_, str>, LevelError> {
        let path = self.path_for(index);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Cow::Owned(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(LevelError::NotFound { index })
            }
            Err(source) => Err(LevelError::Io {
                index,
                path,
                source,
            }),
        }
    }
}

/// In-memory levels, mainly for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct StaticLevels {
    levels: Vec<String>,
}

impl StaticLevels {
    /// Creates a source from grid texts; index `i` is `levels[i]`.
    #[must_use]
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }
}

impl LevelSource for StaticLevels {
    fn read(&self, index: u32) -> Result<Cow<'_, str>, LevelError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.levels.get(i))
            .map(|text| Cow::Borrowed(text.as_str()))
            .ok_or(LevelError::NotFound { index })
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Parses levels from a [`LevelSource`].
pub struct LevelLoader {
    source: Box<dyn LevelSource>,
}

impl fmt::Debug for LevelLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelLoader").finish_non_exhaustive()
    }
}

impl Default for LevelLoader {
    fn default() -> Self {
        Self::new(EmbeddedLevels)
    }
}

impl LevelLoader {
    /// Creates a loader over `source`.
    #[must_use]
    pub fn new(source: impl LevelSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Loads and parses level `index`.
    ///
    /// # Errors
    ///
    /// [`LevelError::NotFound`] past the last level, [`LevelError::Parse`] for
    /// a malformed grid, [`LevelError::Io`] on read failure.
    pub fn load(&self, index: u32) -> Result<Level, LevelError> {
        let text = self.source.read(index)?;
        let level = Level::parse(index, &text)?;
        debug!(
            level = index,
            bricks = level.brick_count(),
            rows = level.rows(),
            columns = level.columns(),
            "level parsed"
        );
        Ok(level)
    }
}
