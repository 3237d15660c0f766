//! Geometry module - shape cell tables, rotation transform and wall kicks
//!
//! Cells are pivot-relative offsets in a y-up frame. Kick tables follow the
//! SRS convention: 8 rows, one per (rotation state, direction) pair, each
//! with 5 candidate translations tried in order. Reference: https://tetris.wiki/SRS

use stackfall_types::{ConfigError, Point, RotationState, Shape, PIECE_CELLS};

/// Offsets of the 4 cells of a piece relative to its pivot.
pub type PieceCells = [Point; PIECE_CELLS];

/// Number of rows in a kick table.
pub const KICK_ROWS: usize = 8;

/// Number of candidate translations per kick row.
pub const KICK_CANDIDATES: usize = 5;

/// Wall kick data, indexed by [`wall_kick_index`].
pub type KickTable = [[Point; KICK_CANDIDATES]; KICK_ROWS];

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// Spawn-orientation cells for a shape.
pub fn cell_offsets(shape: Shape) -> PieceCells {
    match shape {
        Shape::I => [p(-1, 1), p(0, 1), p(1, 1), p(2, 1)],
        Shape::J => [p(-1, 1), p(-1, 0), p(0, 0), p(1, 0)],
        Shape::L => [p(1, 1), p(-1, 0), p(0, 0), p(1, 0)],
        Shape::O => [p(0, 1), p(1, 1), p(0, 0), p(1, 0)],
        Shape::S => [p(0, 1), p(1, 1), p(-1, 0), p(0, 0)],
        Shape::T => [p(0, 1), p(-1, 0), p(0, 0), p(1, 0)],
        Shape::Z => [p(-1, 1), p(0, 1), p(0, 0), p(1, 0)],
    }
}

/// I piece kick table
const I_KICKS: KickTable = [
    // 0->1
    [p(0, 0), p(-2, 0), p(1, 0), p(-2, -1), p(1, 2)],
    // 1->0
    [p(0, 0), p(2, 0), p(-1, 0), p(2, 1), p(-1, -2)],
    // 1->2
    [p(0, 0), p(-1, 0), p(2, 0), p(-1, 2), p(2, -1)],
    // 2->1
    [p(0, 0), p(1, 0), p(-2, 0), p(1, -2), p(-2, 1)],
    // 2->3
    [p(0, 0), p(2, 0), p(-1, 0), p(2, 1), p(-1, -2)],
    // 3->2
    [p(0, 0), p(-2, 0), p(1, 0), p(-2, -1), p(1, 2)],
    // 3->0
    [p(0, 0), p(1, 0), p(-2, 0), p(1, -2), p(-2, 1)],
    // 0->3
    [p(0, 0), p(-1, 0), p(2, 0), p(-1, 2), p(2, -1)],
];

/// Kick table shared by J, L, O, S, T and Z
const JLOSTZ_KICKS: KickTable = [
    // 0->1
    [p(0, 0), p(-1, 0), p(-1, 1), p(0, -2), p(-1, -2)],
    // 1->0
    [p(0, 0), p(1, 0), p(1, -1), p(0, 2), p(1, 2)],
    // 1->2
    [p(0, 0), p(1, 0), p(1, -1), p(0, 2), p(1, 2)],
    // 2->1
    [p(0, 0), p(-1, 0), p(-1, 1), p(0, -2), p(-1, -2)],
    // 2->3
    [p(0, 0), p(1, 0), p(1, 1), p(0, -2), p(1, -2)],
    // 3->2
    [p(0, 0), p(-1, 0), p(-1, -1), p(0, 2), p(-1, 2)],
    // 3->0
    [p(0, 0), p(-1, 0), p(-1, -1), p(0, 2), p(-1, 2)],
    // 0->3
    [p(0, 0), p(1, 0), p(1, 1), p(0, -2), p(1, -2)],
];

/// Get kick table for a shape
pub fn kick_table(shape: Shape) -> &'static KickTable {
    match shape {
        Shape::I => &I_KICKS,
        _ => &JLOSTZ_KICKS,
    }
}

/// Row of the kick table for a turn out of `from` in `direction` (+1 / -1).
///
/// Clockwise turns use row `2 * from`, counter-clockwise turns row `2 * from - 1`,
/// wrapped into the table. The row is keyed on the state before the turn, so it
/// matches the `from->to` labels of the tables; keying on the state after the
/// turn would select a different transition's row.
pub fn wall_kick_index(from: RotationState, direction: i32) -> usize {
    let mut index = from.get() as i32 * 2;
    if direction < 0 {
        index -= 1;
    }
    index.rem_euclid(KICK_ROWS as i32) as usize
}

/// Candidate translations for one kick row, in the order they are tried.
pub fn wall_kick_offsets(shape: Shape, wall_kick_index: usize) -> &'static [Point; KICK_CANDIDATES] {
    &kick_table(shape)[wall_kick_index % KICK_ROWS]
}

/// Turn `cells` by one quarter turn (+1 clockwise, -1 counter-clockwise).
///
/// I and O pivot on the corner shared by their four central cells, so their
/// offsets are shifted by half a cell before turning and rounded up after.
/// Working in doubled coordinates keeps this exact: a doubled half-cell
/// coordinate is always odd, so `ceil(v / 2) == (v + 1) / 2`.
pub fn rotate_cells(shape: Shape, cells: &PieceCells, direction: i32) -> PieceCells {
    let mut out = *cells;
    for cell in out.iter_mut() {
        *cell = match shape {
            Shape::I | Shape::O => {
                let x2 = 2 * cell.x - 1;
                let y2 = 2 * cell.y - 1;
                let rx = y2 * direction;
                let ry = -x2 * direction;
                Point::new((rx + 1) / 2, (ry + 1) / 2)
            }
            _ => Point::new(cell.y * direction, -cell.x * direction),
        };
    }
    out
}

/// Check the static tables once at startup.
pub fn validate_tables() -> Result<(), ConfigError> {
    for shape in Shape::ALL {
        let base = cell_offsets(shape);

        for (i, a) in base.iter().enumerate() {
            if base[i + 1..].contains(a) {
                return Err(ConfigError::MalformedShape { shape });
            }
        }

        for direction in [1, -1] {
            let mut cells = base;
            for _ in 0..4 {
                cells = rotate_cells(shape, &cells, direction);
            }
            if cells != base {
                return Err(ConfigError::MalformedShape { shape });
            }
        }

        for (row, kicks) in kick_table(shape).iter().enumerate() {
            if kicks[0] != Point::ZERO {
                return Err(ConfigError::MalformedKickTable { shape, row });
            }
        }
    }
    Ok(())
}
