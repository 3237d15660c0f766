//! Playfield module - manages the committed grid
//!
//! The grid is `width x height` cells centered on the origin, y-up:
//! x in `origin.x..origin.x + width`, y in `origin.y..origin.y + height`.
//! Storage is a flat row-major vector with row 0 at the bottom.
//!
//! Only committed (locked) tiles live here. The falling piece is composited on
//! top when the visible frame is built, so validity checks always see the
//! committed state only.

use std::collections::BTreeMap;

use stackfall_types::{Cell, GameConfig, Point, Shape};

use crate::geometry::PieceCells;
use crate::piece::Piece;

/// Visible tiles by coordinate: committed grid plus overlaid pieces.
pub type TileMap = BTreeMap<Point, Shape>;

/// Result of [`Playfield::clear_full_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedLines {
    pub count: u32,
    /// Pre-clear row indices (0 = bottom), ascending.
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    width: i32,
    height: i32,
    origin: Point,
    /// Flat array of cells, row-major order (row * width + column)
    cells: Vec<Cell>,
}

impl Playfield {
    /// Create an empty playfield centered on the origin.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            origin: Point::new(-width / 2, -height / 2),
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.board_width, config.board_height)
    }

    #[inline(always)]
    fn index(&self, at: Point) -> Option<usize> {
        if !self.contains(at) {
            return None;
        }
        let column = (at.x - self.origin.x) as usize;
        let row = (at.y - self.origin.y) as usize;
        Some(row * self.width as usize + column)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Lower-left corner of the board.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Board extent as `(min, max)`: min inclusive, max exclusive.
    pub fn bounds(&self) -> (Point, Point) {
        (
            self.origin,
            Point::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }

    /// Board coordinate of the bottom-left cell of `row`.
    pub fn row_start(&self, row: usize) -> Point {
        Point::new(self.origin.x, self.origin.y + row as i32)
    }

    pub fn contains(&self, at: Point) -> bool {
        at.x >= self.origin.x
            && at.x < self.origin.x + self.width
            && at.y >= self.origin.y
            && at.y < self.origin.y + self.height
    }

    /// Get cell at a coordinate. Returns None if out of bounds
    pub fn get(&self, at: Point) -> Option<Cell> {
        self.index(at).map(|idx| self.cells[idx])
    }

    /// Set cell at a coordinate. Returns false if out of bounds
    pub fn set(&mut self, at: Point, cell: Cell) -> bool {
        match self.index(at) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_free(&self, at: Point) -> bool {
        matches!(self.get(at), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, at: Point) -> bool {
        matches!(self.get(at), Some(Some(_)))
    }

    /// True iff every cell placed at `position` is inside the board and unoccupied.
    pub fn is_valid_position(&self, cells: &PieceCells, position: Point) -> bool {
        cells.iter().all(|&cell| self.is_free(cell + position))
    }

    /// Write the piece's cells as occupied. Cells outside the board are ignored.
    pub fn commit(&mut self, piece: &Piece) {
        let Some(shape) = piece.shape() else {
            return;
        };
        for at in piece.absolute_cells() {
            self.set(at, Some(shape));
        }
    }

    /// Erase the piece's cells.
    pub fn clear(&mut self, piece: &Piece) {
        if !piece.has_piece() {
            return;
        }
        for at in piece.absolute_cells() {
            self.set(at, None);
        }
    }

    /// Cells of one row, left to right. Row 0 is the bottom row.
    pub fn row(&self, row: usize) -> &[Cell] {
        let width = self.width as usize;
        let start = row * width;
        &self.cells[start..start + width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= self.height as usize {
            return false;
        }
        self.row(row).iter().all(|cell| cell.is_some())
    }

    /// Clear a row and shift every row above it down by one.
    /// The top row becomes empty.
    fn clear_row(&mut self, row: usize) {
        let width = self.width as usize;
        let start = row * width;

        // copy_within handles the overlapping ranges
        self.cells.copy_within(start + width.., start);

        let top = self.cells.len() - width;
        self.cells[top..].fill(None);
    }

    /// Remove every full row, cascading the rows above down.
    ///
    /// After a row is removed the same index is scanned again, since the row
    /// that moved into it may be full too.
    pub fn clear_full_lines(&mut self) -> ClearedLines {
        let mut rows = Vec::new();
        let mut row = 0usize;

        while row < self.height as usize {
            if self.is_row_full(row) {
                // Rows above each earlier clear have moved down once per clear.
                rows.push(row + rows.len());
                self.clear_row(row);
            } else {
                row += 1;
            }
        }

        ClearedLines {
            count: rows.len() as u32,
            rows,
        }
    }

    /// Occupied cells with their coordinates, bottom row first.
    pub fn occupied(&self) -> impl Iterator<Item = (Point, Shape)> + '_ {
        let width = self.width as usize;
        let origin = self.origin;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|shape| {
                let at = Point::new(
                    origin.x + (idx % width) as i32,
                    origin.y + (idx / width) as i32,
                );
                (at, shape)
            })
        })
    }

    /// Committed tiles with `pieces` drawn over them, later pieces on top.
    ///
    /// Piece cells may lie outside the board (preview and hold areas).
    pub fn composite<'a>(&self, pieces: impl IntoIterator<Item = &'a Piece>) -> TileMap {
        let mut tiles: TileMap = self.occupied().collect();
        for piece in pieces {
            if let Some(shape) = piece.shape() {
                for at in piece.absolute_cells() {
                    tiles.insert(at, shape);
                }
            }
        }
        tiles
    }

    /// Clear the entire board
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_calculation() {
        let field = Playfield::new(10, 20);
        assert_eq!(field.index(Point::new(-5, -10)), Some(0));
        assert_eq!(field.index(Point::new(4, -10)), Some(9));
        assert_eq!(field.index(Point::new(-5, -9)), Some(10));
        assert_eq!(field.index(Point::new(4, 9)), Some(199));
        assert_eq!(field.index(Point::new(-6, 0)), None);
        assert_eq!(field.index(Point::new(5, 0)), None);
        assert_eq!(field.index(Point::new(0, 10)), None);
    }

    #[test]
    fn test_flat_storage_matches_coordinates() {
        let mut field = Playfield::new(10, 20);
        field.set(Point::new(-5, -10), Some(Shape::I));
        field.set(Point::new(0, 0), Some(Shape::T));

        assert_eq!(field.cells[0], Some(Shape::I));
        assert_eq!(field.cells[10 * 10 + 5], Some(Shape::T));
    }

    #[test]
    fn test_clear_row_shifts_down_and_empties_top() {
        let mut field = Playfield::new(4, 4);
        for row in 0..4 {
            field.set(field.row_start(row), Some(Shape::ALL[row]));
        }
        field.clear_row(1);

        assert_eq!(field.row(0)[0], Some(Shape::ALL[0]));
        assert_eq!(field.row(1)[0], Some(Shape::ALL[2]));
        assert_eq!(field.row(2)[0], Some(Shape::ALL[3]));
        assert_eq!(field.row(3)[0], None);
    }

    #[test]
    fn test_bounds_of_default_board() {
        let field = Playfield::new(10, 20);
        assert_eq!(field.bounds(), (Point::new(-5, -10), Point::new(5, 10)));
    }

    #[test]
    fn test_composite_overlays_pieces_without_committing() {
        let mut field = Playfield::new(10, 20);
        field.set(Point::new(-5, -10), Some(Shape::Z));

        let mut preview = Piece::empty();
        preview.initialize(Point::new(8, 6), Shape::O, 0, 1000);
        let tiles = field.composite([&preview, &Piece::empty()]);

        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles.get(&Point::new(-5, -10)), Some(&Shape::Z));
        assert_eq!(tiles.get(&Point::new(8, 6)), Some(&Shape::O));
        assert_eq!(field.occupied().count(), 1);
    }

    #[test]
    fn test_occupied_reports_coordinates() {
        let mut field = Playfield::new(10, 20);
        field.set(Point::new(3, -2), Some(Shape::L));
        let occupied: Vec<_> = field.occupied().collect();
        assert_eq!(occupied, vec![(Point::new(3, -2), Shape::L)]);
    }
}
