use super::super::{BoardView, Move, Piece};

pub(crate) const ORTHOGONAL_STEPS: [(i16, i16); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const DIAGONAL_STEPS: [(i16, i16); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Walk every ray until the edge or the first occupied square, which is
/// included only when it holds an enemy.
pub(super) fn slide<B: BoardView + ?Sized>(
    board: &B,
    piece: &Piece,
    steps: &[(i16, i16)],
) -> Vec<Move> {
    let mut moves = Vec::new();
    let team = piece.team();
    for &(dx, dy) in steps {
        let mut to = piece.position().offset(dx, dy);
        while board.is_on_board(to) {
            if board.is_empty_at(to) {
                moves.push(Move::quiet(to));
            } else {
                if board.is_enemy(to, team) {
                    moves.push(Move::capture(to));
                }
                break;
            }
            to = to.offset(dx, dy);
        }
    }
    moves
}
