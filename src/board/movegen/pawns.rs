use super::super::{BoardView, Coordinate, Move, Piece};

fn free<B: BoardView + ?Sized>(board: &B, to: Coordinate) -> bool {
    board.is_on_board(to) && board.is_empty_at(to)
}

/// Two squares forward, only before the pawn's first move and only through
/// empty squares.
pub(super) fn double_push<B: BoardView + ?Sized>(
    board: &B,
    piece: &Piece,
    direction: i16,
) -> Vec<Move> {
    if piece.has_moved() {
        return Vec::new();
    }
    let from = piece.position();
    let over = from.offset(0, direction);
    let to = from.offset(0, 2 * direction);
    if free(board, over) && free(board, to) {
        vec![Move::quiet(to)]
    } else {
        Vec::new()
    }
}

pub(super) fn push<B: BoardView + ?Sized>(board: &B, piece: &Piece, direction: i16) -> Vec<Move> {
    let to = piece.position().offset(0, direction);
    if free(board, to) {
        vec![Move::quiet(to)]
    } else {
        Vec::new()
    }
}

pub(super) fn capture<B: BoardView + ?Sized>(
    board: &B,
    piece: &Piece,
    direction: i16,
) -> Vec<Move> {
    let from = piece.position();
    [from.offset(1, direction), from.offset(-1, direction)]
        .into_iter()
        .filter(|&to| board.is_on_board(to) && board.is_enemy(to, piece.team()))
        .map(Move::capture)
        .collect()
}
