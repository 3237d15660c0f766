//! Terminal presentation layer.
//!
//! A small, game-oriented rendering layer: the [`TileView`] mirrors the
//! visible tiles from the core's events, the [`GameView`] lays them out in a
//! framebuffer, and the [`TerminalRenderer`] flushes that to the terminal.
//!
//! - Keep `core` deterministic and free of I/O
//! - Allow precise control over aspect ratio (2 columns per cell)

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod view;

pub use stackfall_core as core;
pub use stackfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::TileView;
