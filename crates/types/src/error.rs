//! Caller-visible failures.
//!
//! Rejected moves and rotations are not errors: they are plain `bool`
//! results that drive wall-kick search and lock detection.

use crate::{Point, Shape};

/// Configuration or geometry tables that the simulation cannot run with.
///
/// Always reported at construction time, never while ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroBoardSize { width: i32, height: i32 },
    BoardTooSmall { width: i32, height: i32, min: i32 },
    SpawnOutOfBounds { anchor: Point },
    ZeroStepDelay,
    /// A shape does not have 4 distinct cells, or four turns do not return to the start.
    MalformedShape { shape: Shape },
    /// A wall-kick row does not start with the zero offset.
    MalformedKickTable { shape: Shape, row: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroBoardSize { width, height } => {
                write!(f, "board size must be positive, got {width}x{height}")
            }
            Self::BoardTooSmall { width, height, min } => {
                write!(f, "board {width}x{height} is smaller than {min}x{min}")
            }
            Self::SpawnOutOfBounds { anchor } => {
                write!(f, "spawn anchor ({}, {}) is outside the board", anchor.x, anchor.y)
            }
            Self::ZeroStepDelay => write!(f, "step delay must be greater than zero"),
            Self::MalformedShape { shape } => {
                write!(f, "cell table for shape {} is malformed", shape.as_str())
            }
            Self::MalformedKickTable { shape, row } => write!(
                f,
                "wall-kick row {row} for shape {} does not start with the zero offset",
                shape.as_str()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The spawn position was already occupied. Ends the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnBlocked {
    pub shape: Shape,
    pub anchor: Point,
}

impl std::fmt::Display for SpawnBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot spawn {} at ({}, {}): position is occupied",
            self.shape.as_str(),
            self.anchor.x,
            self.anchor.y
        )
    }
}

impl std::error::Error for SpawnBlocked {}
