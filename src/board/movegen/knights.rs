use super::super::{BoardView, Move, Piece};
use super::step_target;

pub(crate) const KNIGHT_OFFSETS: [(i16, i16); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(super) fn leap<B: BoardView + ?Sized>(board: &B, piece: &Piece) -> Vec<Move> {
    let from = piece.position();
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| step_target(board, piece, from.offset(dx, dy)))
        .collect()
}
