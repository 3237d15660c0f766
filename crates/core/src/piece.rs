//! Piece module - one falling, preview or held piece
//!
//! A piece owns its shape, pivot position, rotation state, the current
//! (rotation-applied) cells and its timers. Moves and rotations are checked
//! against the committed grid and either fully apply or leave the piece
//! untouched.

use stackfall_types::{Point, RotationState, Shape, PIECE_CELLS};

use crate::geometry::{cell_offsets, rotate_cells, wall_kick_index, wall_kick_offsets, PieceCells};
use crate::playfield::Playfield;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    shape: Option<Shape>,
    position: Point,
    rotation: RotationState,
    cells: PieceCells,
    /// Time since the last successful displacement.
    lock_ms: u32,
    /// Resets spent since the piece last reached a new lowest row.
    lock_resets: u32,
    lock_reset_limit: Option<u32>,
    lowest_y: i32,
    /// Controller clock value at which the next gravity step is due.
    step_deadline_ms: u64,
}

impl Piece {
    /// A slot with no shape assigned yet.
    pub fn empty() -> Self {
        Self {
            shape: None,
            position: Point::ZERO,
            rotation: RotationState::SPAWN,
            cells: [Point::ZERO; PIECE_CELLS],
            lock_ms: 0,
            lock_resets: 0,
            lock_reset_limit: None,
            lowest_y: 0,
            step_deadline_ms: 0,
        }
    }

    /// (Re)initialize at `anchor` with the spawn orientation of `shape`.
    pub fn initialize(&mut self, anchor: Point, shape: Shape, now_ms: u64, step_delay_ms: u32) {
        self.shape = Some(shape);
        self.position = anchor;
        self.rotation = RotationState::SPAWN;
        self.cells = cell_offsets(shape);
        self.lock_ms = 0;
        self.lock_resets = 0;
        self.lowest_y = anchor.y;
        self.step_deadline_ms = now_ms + step_delay_ms as u64;
    }

    /// Cap on lock timer resets for this piece (None = unlimited).
    pub fn set_lock_reset_limit(&mut self, limit: Option<u32>) {
        self.lock_reset_limit = limit;
    }

    pub fn has_piece(&self) -> bool {
        self.shape.is_some()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Pivot-relative cells in the current orientation.
    pub fn cells(&self) -> &PieceCells {
        &self.cells
    }

    /// Board coordinates of the 4 cells.
    pub fn absolute_cells(&self) -> PieceCells {
        let mut out = self.cells;
        for cell in out.iter_mut() {
            *cell = *cell + self.position;
        }
        out
    }

    pub fn lock_ms(&self) -> u32 {
        self.lock_ms
    }

    pub fn add_elapsed(&mut self, elapsed_ms: u32) {
        self.lock_ms = self.lock_ms.saturating_add(elapsed_ms);
    }

    pub fn step_deadline_ms(&self) -> u64 {
        self.step_deadline_ms
    }

    pub fn set_step_deadline_ms(&mut self, deadline_ms: u64) {
        self.step_deadline_ms = deadline_ms;
    }

    /// Translate the piece if the new position is valid and actually different.
    ///
    /// A successful move resets the lock timer; a rejected or zero move does not.
    /// Downward moves always reset it and do not count against the reset limit;
    /// reaching a new lowest row also restores the full reset allowance.
    pub fn try_move(&mut self, translation: Point, field: &Playfield) -> bool {
        if !self.has_piece() {
            return false;
        }

        let candidate = self.position + translation;
        if candidate != self.position && field.is_valid_position(&self.cells, candidate) {
            self.position = candidate;
            if translation.y < 0 {
                self.lock_ms = 0;
                if candidate.y < self.lowest_y {
                    self.lowest_y = candidate.y;
                    self.lock_resets = 0;
                }
            } else {
                self.reset_lock_timer();
            }
            return true;
        }

        false
    }

    /// Rotate by one quarter turn (+1 clockwise, -1 counter-clockwise) with wall kicks.
    ///
    /// The turn is applied to the current cells, then each kick candidate is
    /// tried in table order. If none fits, rotation and cells are restored.
    pub fn rotate(&mut self, direction: i32, field: &Playfield) -> bool {
        let Some(shape) = self.shape else {
            return false;
        };
        let direction = direction.signum();
        if direction == 0 {
            return false;
        }

        let original_rotation = self.rotation;
        let original_cells = self.cells;
        let kick_index = wall_kick_index(original_rotation, direction);

        self.rotation = original_rotation.turned(direction);
        self.cells = rotate_cells(shape, &original_cells, direction);

        for &kick in wall_kick_offsets(shape, kick_index) {
            let candidate = self.position + kick;
            if field.is_valid_position(&self.cells, candidate) {
                self.position = candidate;
                self.reset_lock_timer();
                return true;
            }
        }

        self.rotation = original_rotation;
        self.cells = original_cells;
        false
    }

    /// Move down until blocked. Returns the number of rows dropped.
    pub fn drop_to_floor(&mut self, field: &Playfield) -> u32 {
        let mut rows = 0;
        while self.try_move(Point::DOWN, field) {
            rows += 1;
        }
        rows
    }

    fn reset_lock_timer(&mut self) {
        if let Some(limit) = self.lock_reset_limit {
            if self.lock_resets >= limit {
                return;
            }
        }
        self.lock_ms = 0;
        self.lock_resets += 1;
    }
}

impl Default for Piece {
    fn default() -> Self {
        Self::empty()
    }
}
