//! TileView: the presentation-side mirror of the visible tiles.
//!
//! It only ever learns about the game through [`GameEvent`]s, so it doubles
//! as a check that the event stream is enough to reconstruct the frame.

use crate::core::TileMap;
use crate::types::{GameEvent, Point, Shape};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileView {
    tiles: TileMap,
    lines: u32,
    pieces: u32,
    game_over: bool,
}

impl TileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TilesChanged { at, tile } => match tile {
                Some(shape) => {
                    self.tiles.insert(*at, *shape);
                }
                None => {
                    self.tiles.remove(at);
                }
            },
            GameEvent::LinesCleared { count, .. } => self.lines += count,
            GameEvent::PieceLocked { .. } => self.pieces += 1,
            GameEvent::PieceSpawned { .. } => {}
            GameEvent::GameOver => self.game_over = true,
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Counters and the game-over flag are cleared; tiles are left to the
    /// `TilesChanged` events of the restart.
    pub fn reset_counters(&mut self) {
        self.lines = 0;
        self.pieces = 0;
        self.game_over = false;
    }

    pub fn tile(&self, at: Point) -> Option<Shape> {
        self.tiles.get(&at).copied()
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}
