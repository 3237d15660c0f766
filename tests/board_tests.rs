//! Playfield tests - bounds, validity, commit and line clearing

use stackfall::core::{Piece, Playfield};
use stackfall::types::{Point, Shape, BOARD_HEIGHT, BOARD_WIDTH};

fn fill_row(field: &mut Playfield, row: usize, shape: Shape) {
    let start = field.row_start(row);
    for dx in 0..field.width() {
        field.set(Point::new(start.x + dx, start.y), Some(shape));
    }
}

#[test]
fn test_playfield_new_empty() {
    let field = Playfield::new(BOARD_WIDTH, BOARD_HEIGHT);
    assert_eq!(field.width(), 10);
    assert_eq!(field.height(), 20);
    assert_eq!(field.origin(), Point::new(-5, -10));

    for y in -10..10 {
        for x in -5..5 {
            assert!(field.is_free(Point::new(x, y)), "Cell ({}, {}) should be free", x, y);
            assert_eq!(field.get(Point::new(x, y)), Some(None));
        }
    }
}

#[test]
fn test_playfield_get_out_of_bounds() {
    let field = Playfield::new(10, 20);

    assert_eq!(field.get(Point::new(-6, 0)), None);
    assert_eq!(field.get(Point::new(5, 0)), None);
    assert_eq!(field.get(Point::new(0, -11)), None);
    assert_eq!(field.get(Point::new(0, 10)), None);
}

#[test]
fn test_playfield_set_and_get() {
    let mut field = Playfield::new(10, 20);

    assert!(field.set(Point::new(4, 9), Some(Shape::T)));
    assert_eq!(field.get(Point::new(4, 9)), Some(Some(Shape::T)));
    assert!(field.is_occupied(Point::new(4, 9)));

    assert!(field.set(Point::new(4, 9), None));
    assert!(field.is_free(Point::new(4, 9)));

    assert!(!field.set(Point::new(5, 9), Some(Shape::T)));
    assert!(!field.set(Point::new(0, 10), Some(Shape::T)));
}

#[test]
fn test_board_size_is_configurable() {
    let field = Playfield::new(6, 8);
    assert_eq!(field.bounds(), (Point::new(-3, -4), Point::new(3, 4)));
    assert!(field.contains(Point::new(2, 3)));
    assert!(!field.contains(Point::new(3, 3)));
}

#[test]
fn test_is_valid_position() {
    let mut field = Playfield::new(10, 20);
    let cells = [Point::new(-1, 0), Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)];

    assert!(field.is_valid_position(&cells, Point::new(0, 0)));
    // Touching the walls is fine, crossing them is not.
    assert!(field.is_valid_position(&cells, Point::new(-4, -10)));
    assert!(!field.is_valid_position(&cells, Point::new(-5, 0)));
    assert!(!field.is_valid_position(&cells, Point::new(4, 0)));
    assert!(!field.is_valid_position(&cells, Point::new(0, -11)));
    assert!(!field.is_valid_position(&cells, Point::new(0, 9)));

    field.set(Point::new(0, 1), Some(Shape::Z));
    assert!(!field.is_valid_position(&cells, Point::new(0, 0)));
    assert!(field.is_valid_position(&cells, Point::new(0, 2)));
}

#[test]
fn test_commit_and_clear_piece() {
    let mut field = Playfield::new(10, 20);
    let mut piece = Piece::empty();
    piece.initialize(Point::new(0, 0), Shape::L, 0, 1000);

    field.commit(&piece);
    for at in piece.absolute_cells() {
        assert_eq!(field.get(at), Some(Some(Shape::L)));
    }
    assert_eq!(field.occupied().count(), 4);

    field.clear(&piece);
    assert_eq!(field.occupied().count(), 0);
}

#[test]
fn test_commit_ignores_cells_outside_board() {
    let mut field = Playfield::new(10, 20);
    let mut piece = Piece::empty();
    // I spawn cells sit one row above the anchor: y = 10 is off the board.
    piece.initialize(Point::new(0, 9), Shape::I, 0, 1000);

    field.commit(&piece);
    assert_eq!(field.occupied().count(), 0);
}

#[test]
fn test_is_row_full() {
    let mut field = Playfield::new(10, 20);
    assert!(!field.is_row_full(0));

    fill_row(&mut field, 0, Shape::I);
    assert!(field.is_row_full(0));

    field.set(Point::new(0, -10), None);
    assert!(!field.is_row_full(0));
    assert!(!field.is_row_full(20));
}

#[test]
fn test_clear_four_lines_compacts_rows_above() {
    let mut field = Playfield::new(10, 20);
    for row in 0..4 {
        fill_row(&mut field, row, Shape::I);
    }
    // A distinct marker in each row above the full ones.
    for row in 4..20 {
        let start = field.row_start(row);
        field.set(
            Point::new(start.x + (row % 10) as i32, start.y),
            Some(Shape::ALL[row % 7]),
        );
    }
    let before: Vec<Vec<_>> = (0..20).map(|row| field.row(row).to_vec()).collect();

    let cleared = field.clear_full_lines();
    assert_eq!(cleared.count, 4);
    assert_eq!(cleared.rows, vec![0, 1, 2, 3]);

    for row in 0..16 {
        assert_eq!(field.row(row), before[row + 4].as_slice(), "row {}", row);
    }
    for row in 16..20 {
        assert!(field.row(row).iter().all(|cell| cell.is_none()), "row {}", row);
    }
}

#[test]
fn test_clear_non_contiguous_lines() {
    let mut field = Playfield::new(10, 20);
    fill_row(&mut field, 0, Shape::I);
    fill_row(&mut field, 2, Shape::O);
    field.set(Point::new(-5, -9), Some(Shape::T)); // row 1
    field.set(Point::new(4, -7), Some(Shape::S)); // row 3

    let cleared = field.clear_full_lines();
    assert_eq!(cleared.count, 2);
    assert_eq!(cleared.rows, vec![0, 2]);

    assert_eq!(field.get(Point::new(-5, -10)), Some(Some(Shape::T)));
    assert_eq!(field.get(Point::new(4, -9)), Some(Some(Shape::S)));
    assert_eq!(field.occupied().count(), 2);
}

#[test]
fn test_clear_nothing() {
    let mut field = Playfield::new(10, 20);
    field.set(Point::new(0, -10), Some(Shape::J));

    let cleared = field.clear_full_lines();
    assert_eq!(cleared.count, 0);
    assert!(cleared.rows.is_empty());
    assert_eq!(field.occupied().count(), 1);
}

#[test]
fn test_clear_full_top_row() {
    let mut field = Playfield::new(10, 20);
    fill_row(&mut field, 19, Shape::Z);

    let cleared = field.clear_full_lines();
    assert_eq!(cleared.rows, vec![19]);
    assert_eq!(field.occupied().count(), 0);
}

#[test]
fn test_clear_all() {
    let mut field = Playfield::new(10, 20);
    fill_row(&mut field, 5, Shape::L);
    field.clear_all();
    assert_eq!(field.occupied().count(), 0);
}
