//! Property tests for the simulation core.
//!
//! Invariants covered:
//! - Accepted moves and rotations keep every cell on the board and on free cells.
//! - A rejected rotation leaves position, orientation and cells untouched.
//! - Through `Game::update`, the live piece never overlaps the committed grid.
//! - Committed cells stay inside the board and the frame composite covers them.

use proptest::prelude::*;
use stackfall::core::{Game, Piece, Playfield};
use stackfall::types::{GameConfig, Horizontal, InputFrame, Point, RotateIntent, Shape};

#[derive(Debug, Clone, Copy)]
enum Op {
    Left,
    Right,
    Down,
    Cw,
    Ccw,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Left),
        Just(Op::Right),
        Just(Op::Down),
        Just(Op::Cw),
        Just(Op::Ccw),
    ]
}

fn frame_strategy() -> impl Strategy<Value = InputFrame> {
    (
        prop_oneof![
            Just(Horizontal::None),
            Just(Horizontal::Left),
            Just(Horizontal::Right)
        ],
        any::<bool>(),
        prop::bool::weighted(0.05),
        prop_oneof![
            4 => Just(RotateIntent::None),
            1 => Just(RotateIntent::Clockwise),
            1 => Just(RotateIntent::CounterClockwise)
        ],
        prop::bool::weighted(0.05),
    )
        .prop_map(|(horizontal, soft_drop, hard_drop, rotate, hold)| InputFrame {
            horizontal,
            soft_drop,
            hard_drop,
            rotate,
            hold,
        })
}

/// Garbage in the bottom half only, so the spawn area stays open.
fn garbage_field(mask: &[bool]) -> Playfield {
    let mut field = Playfield::new(10, 20);
    for (i, &filled) in mask.iter().enumerate() {
        if filled {
            let x = -5 + (i % 10) as i32;
            let y = -10 + (i / 10) as i32;
            field.set(Point::new(x, y), Some(Shape::Z));
        }
    }
    field
}

fn assert_placed_validly(piece: &Piece, field: &Playfield) {
    for at in piece.absolute_cells() {
        assert!(field.contains(at), "{:?} off the board", at);
        assert!(field.is_free(at), "{:?} overlaps the grid", at);
    }
}

proptest! {
    #[test]
    fn moves_and_rotations_stay_valid(
        shape_index in 0usize..7,
        mask in prop::collection::vec(prop::bool::weighted(0.3), 100),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let shape = Shape::ALL[shape_index];
        let field = garbage_field(&mask);
        let mut piece = Piece::empty();
        piece.initialize(Point::new(-1, 8), shape, 0, 1000);
        assert_placed_validly(&piece, &field);

        for op in ops {
            let before = piece.clone();
            let accepted = match op {
                Op::Left => piece.try_move(Point::LEFT, &field),
                Op::Right => piece.try_move(Point::RIGHT, &field),
                Op::Down => piece.try_move(Point::DOWN, &field),
                Op::Cw => piece.rotate(1, &field),
                Op::Ccw => piece.rotate(-1, &field),
            };

            if accepted {
                assert_placed_validly(&piece, &field);
            } else {
                prop_assert_eq!(&piece, &before);
            }
        }
    }

    #[test]
    fn live_piece_never_overlaps_grid(
        seed in any::<u32>(),
        frames in prop::collection::vec(frame_strategy(), 1..400),
        elapsed in 1u32..40,
    ) {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.start();

        for frame in frames {
            game.update(elapsed, &frame);

            let field = game.playfield();
            for (at, _) in field.occupied() {
                prop_assert!(field.contains(at));
            }
            if game.is_game_over() {
                break;
            }
            assert_placed_validly(game.current(), field);

            let tiles = game.visible_tiles();
            for (at, shape) in field.occupied() {
                prop_assert_eq!(tiles.get(&at), Some(&shape));
            }
        }
    }

    #[test]
    fn hard_drop_rests_on_floor_or_stack(
        seed in any::<u32>(),
        taps in prop::collection::vec((-5i32..6, 0u8..4), 1..20),
    ) {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.start();

        for (shift, turns) in taps {
            if game.is_game_over() {
                break;
            }
            for _ in 0..turns {
                game.update(1, &InputFrame::rotate(RotateIntent::Clockwise));
                game.update(1, &InputFrame::IDLE);
            }
            let direction = if shift < 0 { Horizontal::Left } else { Horizontal::Right };
            for _ in 0..shift.abs() {
                game.update(1, &InputFrame::held(direction));
                game.update(1, &InputFrame::IDLE);
            }

            // After dropping, the piece one row lower would be invalid.
            let mut probe = game.current().clone();
            probe.drop_to_floor(game.playfield());
            prop_assert!(!probe.try_move(Point::DOWN, game.playfield()));
            game.update(1, &InputFrame::hard_drop());
        }
    }
}
