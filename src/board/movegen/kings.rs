use super::super::{BoardView, Move, Piece};
use super::step_target;

pub(crate) const KING_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub(super) fn step<B: BoardView + ?Sized>(board: &B, piece: &Piece) -> Vec<Move> {
    let from = piece.position();
    KING_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| step_target(board, piece, from.offset(dx, dy)))
        .collect()
}
