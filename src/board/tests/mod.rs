//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `movegen.rs` - Move rules on an otherwise empty board
//! - `draw.rs` - Draw detection (repetition, fifty-move rule)
//! - `make_unmake.rs` - Reversible move correctness
//! - `proptest.rs` - Property-based tests


use crate::board::{BoardBuilder, Color, Coordinate, PieceId, PieceKind, Position};

pub(super) fn sq(notation: &str) -> Coordinate {
    notation.parse().expect("valid square")
}

/// A position holding the two kings out of the way plus `extra`.
pub(super) fn with_kings(extra: &[(&str, Color, PieceKind)]) -> Position {
    let mut builder = BoardBuilder::new()
        .piece(sq("h1"), Color::White, PieceKind::King)
        .piece(sq("h8"), Color::Black, PieceKind::King);
    for &(square, color, kind) in extra {
        builder = builder.piece(sq(square), color, kind);
    }
    builder.build().expect("valid position")
}

pub(super) fn id_at(position: &Position, notation: &str) -> PieceId {
    position.board.get(sq(notation)).expect("occupied square")
}
