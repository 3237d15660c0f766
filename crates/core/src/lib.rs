//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the rules and the per-tick state machine. It has no
//! dependency on terminals or clocks: the host passes elapsed milliseconds and
//! sampled intents in, and renders from the events that come back.
//!
//! - **Deterministic**: the same seed and input sequence give the same game
//! - **Integer only**: coordinates, rotations and timers never touch floats
//!
//! # Module Structure
//!
//! - [`geometry`]: shape cells, quarter-turn rotation and wall-kick tables
//! - [`bag`]: randomizer with a no-repeat window of 7
//! - [`playfield`]: committed grid, validity checks and line clearing
//! - [`piece`]: one falling/preview/held piece with move, rotate and timers
//! - [`shift`]: DAS/ARR auto-shift for held inputs
//! - [`game`]: the controller tying it all together
//!
//! # Example
//!
//! ```
//! use stackfall_core::{Game, GameConfig};
//! use stackfall_core::types::{GameEvent, InputFrame};
//!
//! let mut game = Game::new(GameConfig::default(), 12345).unwrap();
//! game.start();
//!
//! let events = game.update(16, &InputFrame::hard_drop());
//! assert!(events.iter().any(|e| matches!(e, GameEvent::PieceLocked { .. })));
//! ```

pub mod bag;
pub mod game;
pub mod geometry;
pub mod piece;
pub mod playfield;
pub mod shift;

pub use stackfall_types as types;

pub use bag::{BagRandomizer, SimpleRng, TakenSet};
pub use game::{Game, Phase};
pub use geometry::{rotate_cells, wall_kick_index, PieceCells};
pub use piece::Piece;
pub use playfield::{ClearedLines, Playfield, TileMap};
pub use shift::{AutoShift, ShiftPhase};
pub use stackfall_types::GameConfig;
