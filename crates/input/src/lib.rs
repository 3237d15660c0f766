//! Terminal input module.
//!
//! Maps `crossterm` key events into [`Control`]s and tracks held keys so the
//! host can sample one [`crate::types::InputFrame`] per tick. DAS/ARR timing
//! lives in the core; this crate only reports what is held and what was pressed.

pub mod map;
pub mod tracker;

pub use stackfall_types as types;

pub use map::{map_key, should_quit, Control};
pub use tracker::KeyTracker;
