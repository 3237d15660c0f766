//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no simulation logic, so they can be used by
//! the core, the key tracker and the terminal front end alike.
//!
//! # Coordinates
//!
//! The playfield uses a centered, y-up coordinate system:
//!
//! - **Width**: 10 columns, x in `-5..5`
//! - **Height**: 20 rows, y in `-10..10`
//! - **Spawn anchor**: (-1, 8)
//!
//! Row index 0 is the bottom row (y = -10 on the default board).
//!
//! # Timing Defaults
//!
//! All timing values are integer milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_STEP_DELAY_MS` | 1000 | Gravity interval |
//! | `DEFAULT_LOCK_DELAY_MS` | 500 | Time without displacement before a step locks the piece |
//! | `DEFAULT_DAS_MS` | 183 | Delay before auto-repeat starts |
//! | `DEFAULT_ARR_MS` | 33 | Interval between auto-repeats |
//!
//! # Examples
//!
//! ```
//! use stackfall_types::{Point, RotationState, Shape};
//!
//! let shape = Shape::from_str("t").unwrap();
//! assert_eq!(shape, Shape::T);
//! assert_eq!(Shape::from_index(shape.index()), Some(Shape::T));
//!
//! let rotation = RotationState::SPAWN.turned(-1);
//! assert_eq!(rotation.get(), 3);
//!
//! assert_eq!(Point::new(1, 2) + Point::DOWN, Point::new(1, 1));
//! ```

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;

pub use config::{BagKind, GameConfig, HoldPolicy};
pub use error::{ConfigError, SpawnBlocked};

/// Default board width in cells.
pub const BOARD_WIDTH: i32 = 10;

/// Default board height in cells.
pub const BOARD_HEIGHT: i32 = 20;

/// Host tick interval in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Default gravity interval (1 second per row).
pub const DEFAULT_STEP_DELAY_MS: u32 = 1000;

/// Default lock delay.
pub const DEFAULT_LOCK_DELAY_MS: u32 = 500;

/// Default DAS (Delayed Auto Shift) in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 183;

/// Default ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 33;

/// Number of cells in every piece.
pub const PIECE_CELLS: usize = 4;

/// Number of distinct shapes (and the no-repeat window of the bag).
pub const SHAPE_COUNT: usize = 7;

/// Integer board coordinate. `y` grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };
    pub const LEFT: Point = Point { x: -1, y: 0 };
    pub const RIGHT: Point = Point { x: 1, y: 0 };
    pub const DOWN: Point = Point { x: 0, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

// Row-major ordering (bottom row first) so ordered maps iterate like a scan.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Tetromino shapes. Also used as the tile identifier stored on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl Shape {
    /// All shapes in index order.
    pub const ALL: [Shape; SHAPE_COUNT] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::J,
        Shape::L,
        Shape::S,
        Shape::Z,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse shape from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(Shape::I),
            "o" => Some(Shape::O),
            "t" => Some(Shape::T),
            "j" => Some(Shape::J),
            "l" => Some(Shape::L),
            "s" => Some(Shape::S),
            "z" => Some(Shape::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::I => "i",
            Shape::O => "o",
            Shape::T => "t",
            Shape::J => "j",
            Shape::L => "l",
            Shape::S => "s",
            Shape::Z => "z",
        }
    }
}

/// Rotation state in `0..4`. 0 is the spawn orientation, +1 is a clockwise turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationState(u8);

impl RotationState {
    pub const SPAWN: RotationState = RotationState(0);

    /// Wraps any integer into `0..4`.
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(4) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// State after turning by `direction` quarter turns (+1 clockwise, -1 counter-clockwise).
    pub fn turned(self, direction: i32) -> Self {
        Self::new(self.0 as i32 + direction)
    }
}

/// Held horizontal intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Horizontal {
    #[default]
    None,
    Left,
    Right,
}

impl Horizontal {
    pub fn offset(self) -> Option<Point> {
        match self {
            Horizontal::None => None,
            Horizontal::Left => Some(Point::LEFT),
            Horizontal::Right => Some(Point::RIGHT),
        }
    }
}

/// Edge-triggered rotation intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RotateIntent {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl RotateIntent {
    /// +1 for clockwise, -1 for counter-clockwise.
    pub fn direction(self) -> Option<i32> {
        match self {
            RotateIntent::None => None,
            RotateIntent::Clockwise => Some(1),
            RotateIntent::CounterClockwise => Some(-1),
        }
    }
}

/// Input intents sampled once per tick.
///
/// `horizontal` and `soft_drop` describe held state; `hard_drop`, `rotate`
/// and `hold` are true only on the tick of the initial press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputFrame {
    pub horizontal: Horizontal,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub rotate: RotateIntent,
    pub hold: bool,
}

impl InputFrame {
    pub const IDLE: InputFrame = InputFrame {
        horizontal: Horizontal::None,
        soft_drop: false,
        hard_drop: false,
        rotate: RotateIntent::None,
        hold: false,
    };

    pub fn held(horizontal: Horizontal) -> Self {
        Self {
            horizontal,
            ..Self::IDLE
        }
    }

    pub fn hard_drop() -> Self {
        Self {
            hard_drop: true,
            ..Self::IDLE
        }
    }

    pub fn rotate(rotate: RotateIntent) -> Self {
        Self {
            rotate,
            ..Self::IDLE
        }
    }

    pub fn hold() -> Self {
        Self {
            hold: true,
            ..Self::IDLE
        }
    }
}

/// Tile value shown at a coordinate (None = empty).
pub type Cell = Option<Shape>;

/// Events emitted by the core for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A visible tile changed (board, preview or hold area).
    TilesChanged { at: Point, tile: Cell },
    /// Full rows were removed. `rows` are pre-clear row indices, 0 = bottom.
    LinesCleared { count: u32, rows: Vec<usize> },
    /// The active piece was committed to the board.
    PieceLocked {
        shape: Shape,
        cells: [Point; PIECE_CELLS],
    },
    /// A new active piece entered the board.
    PieceSpawned { shape: Shape },
    /// Spawn was blocked; the session is over.
    GameOver,
}
