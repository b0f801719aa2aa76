//! Move-generation rules.
//!
//! Every piece owns a static slice of [`MoveRule`]s; a piece's pseudo-legal
//! moves are the union of what its rules produce. Rules are stateless and
//! only read the board through [`BoardView`].

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{BoardView, Move, Piece};

use sliders::{DIAGONAL_STEPS, ORTHOGONAL_STEPS};

/// One movement pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRule {
    /// Slide along ranks and files (rook).
    Line,
    /// Slide along diagonals (bishop).
    Diagonal,
    /// The eight `(1, 2)` leaps.
    Knight,
    /// One step in any direction.
    King,
    /// Two squares forward from an unmoved pawn.
    InitialPawn { direction: i16 },
    /// One square forward.
    PawnPush { direction: i16 },
    /// One square diagonally forward, capturing only.
    PawnCapture { direction: i16 },
}

impl MoveRule {
    /// Moves this rule allows `piece` from its current square.
    #[must_use]
    pub fn compute<B: BoardView + ?Sized>(&self, board: &B, piece: &Piece) -> Vec<Move> {
        match *self {
            MoveRule::Line => sliders::slide(board, piece, &ORTHOGONAL_STEPS),
            MoveRule::Diagonal => sliders::slide(board, piece, &DIAGONAL_STEPS),
            MoveRule::Knight => knights::leap(board, piece),
            MoveRule::King => kings::step(board, piece),
            MoveRule::InitialPawn { direction } => pawns::double_push(board, piece, direction),
            MoveRule::PawnPush { direction } => pawns::push(board, piece, direction),
            MoveRule::PawnCapture { direction } => pawns::capture(board, piece, direction),
        }
    }
}

pub(crate) const ROOK_RULES: &[MoveRule] = &[MoveRule::Line];
pub(crate) const BISHOP_RULES: &[MoveRule] = &[MoveRule::Diagonal];
/// Queens, and pawns once promoted.
pub(crate) const QUEEN_RULES: &[MoveRule] = &[MoveRule::Line, MoveRule::Diagonal];
pub(crate) const KNIGHT_RULES: &[MoveRule] = &[MoveRule::Knight];
pub(crate) const KING_RULES: &[MoveRule] = &[MoveRule::King];
/// White pawns walk towards row 0.
pub(crate) const PAWN_UP_RULES: &[MoveRule] = &[
    MoveRule::InitialPawn { direction: -1 },
    MoveRule::PawnPush { direction: -1 },
    MoveRule::PawnCapture { direction: -1 },
];
pub(crate) const PAWN_DOWN_RULES: &[MoveRule] = &[
    MoveRule::InitialPawn { direction: 1 },
    MoveRule::PawnPush { direction: 1 },
    MoveRule::PawnCapture { direction: 1 },
];

/// Quiet move onto an empty square, capture onto an enemy, nothing onto a
/// friendly piece or off the board.
fn step_target<B: BoardView + ?Sized>(board: &B, piece: &Piece, to: super::Coordinate) -> Option<Move> {
    if !board.is_on_board(to) {
        return None;
    }
    if board.is_empty_at(to) {
        Some(Move::quiet(to))
    } else if board.is_enemy(to, piece.team()) {
        Some(Move::capture(to))
    } else {
        None
    }
}
