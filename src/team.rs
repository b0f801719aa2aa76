//! One side's pieces.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{
    Board, BoardView, Color, Coordinate, Move, PieceId, PieceKind, ReversibleMove, SetupError,
    Squares,
};

/// Ordering weights per piece kind, used by [`Team::sort_pieces`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceValues {
    pub pawn: i32,
    pub knight: i32,
    pub bishop: i32,
    pub rook: i32,
    pub queen: i32,
    pub king: i32,
}

impl PieceValues {
    /// Opening: minor pieces and pawns first.
    pub const EARLY: PieceValues = PieceValues {
        pawn: 4,
        knight: 5,
        bishop: 4,
        rook: 1,
        queen: 3,
        king: 2,
    };

    pub const MID: PieceValues = PieceValues {
        pawn: 2,
        knight: 3,
        bishop: 3,
        rook: 4,
        queen: 6,
        king: 10,
    };

    pub const LATE: PieceValues = PieceValues {
        pawn: 1,
        knight: 3,
        bishop: 4,
        rook: 5,
        queen: 9,
        king: 10,
    };

    #[inline]
    #[must_use]
    pub const fn value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Knight => self.knight,
            PieceKind::Bishop => self.bishop,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }
}

/// A side: its live pieces, in move-ordering order, and its king.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    color: Color,
    pub(crate) pieces: Vec<PieceId>,
    king: PieceId,
    queen: Option<PieceId>,
}

impl Team {
    /// Team of `color` made of `pieces`, which must contain exactly one king.
    pub fn new<S: Squares>(
        color: Color,
        pieces: Vec<PieceId>,
        board: &Board<S>,
    ) -> Result<Self, SetupError> {
        let mut kings = pieces
            .iter()
            .copied()
            .filter(|&id| board.piece(id).kind() == PieceKind::King);
        let king = kings.next();
        let extra = kings.count();
        let king = match king {
            Some(king) if extra == 0 => king,
            _ => {
                return Err(SetupError::KingCount {
                    team: color,
                    found: usize::from(king.is_some()) + extra,
                })
            }
        };
        let queen = pieces
            .iter()
            .copied()
            .find(|&id| board.piece(id).kind() == PieceKind::Queen);
        Ok(Team {
            color,
            pieces,
            king,
            queen,
        })
    }

    /// Team made of every live piece of `color` on `board`.
    pub fn from_board<S: Squares>(color: Color, board: &Board<S>) -> Result<Self, SetupError> {
        Team::new(color, board.team_pieces(color), board)
    }

    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    #[inline]
    #[must_use]
    pub fn king(&self) -> PieceId {
        self.king
    }

    /// The first queen the team started with.
    #[inline]
    #[must_use]
    pub fn queen(&self) -> Option<PieceId> {
        self.queen
    }

    /// Reorder pieces by descending value; equal values keep their order.
    pub fn sort_pieces<S: Squares>(&mut self, board: &Board<S>, values: &PieceValues) {
        self.pieces
            .sort_by_key(|&id| std::cmp::Reverse(values.value(board.piece(id).representation())));
    }

    /// Pseudo-legal moves of every piece, in piece order.
    #[must_use]
    pub fn compute_all_moves<S: Squares>(&self, board: &Board<S>) -> Vec<(PieceId, Move)> {
        self.pieces
            .iter()
            .flat_map(|&id| {
                board
                    .piece(id)
                    .compute_valid_moves(board)
                    .into_iter()
                    .map(move |mv| (id, mv))
            })
            .collect()
    }

    /// Moves after which the own king is not attacked, captures first.
    ///
    /// Each candidate is tried under a [`ReversibleMove`], so the board and
    /// `enemy` are unchanged afterwards.
    pub fn compute_valid_moves<S: Squares>(
        &self,
        board: &mut Board<S>,
        enemy: &mut Team,
    ) -> Vec<(PieceId, Move)> {
        let mut valid: Vec<(PieceId, Move)> = self
            .compute_all_moves(board)
            .into_iter()
            .filter(|&(id, mv)| {
                let trial = ReversibleMove::apply(&mut *board, &mut *enemy, id, mv.destination);
                !self.in_check(trial.board(), trial.enemy().pieces())
            })
            .collect();
        valid.sort_by_key(|(_, mv)| !mv.can_capture);
        valid
    }

    /// True if any of `enemy_pieces` can capture on the king's square.
    #[must_use]
    pub fn in_check<S: Squares>(&self, board: &Board<S>, enemy_pieces: &[PieceId]) -> bool {
        let target = board.piece(self.king).position();
        enemy_pieces.iter().any(|&id| {
            let piece = board.piece(id);
            !piece.is_captured() && piece.can_capture_at(board, target)
        })
    }

    /// True if the square is attacked by any of `enemy_pieces`.
    #[must_use]
    pub(crate) fn is_attacked<S: Squares>(
        board: &Board<S>,
        square: Coordinate,
        enemy_pieces: &[PieceId],
    ) -> bool {
        board.is_on_board(square)
            && enemy_pieces.iter().any(|&id| {
                let piece = board.piece(id);
                !piece.is_captured() && piece.attacks(board, square)
            })
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Coordinate};

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let all = position.white.compute_all_moves(&position.board);
        assert_eq!(all.len(), 20);
        let valid = position
            .white
            .compute_valid_moves(&mut position.board, &mut position.black);
        assert_eq!(valid.len(), 20);
    }

    #[test]
    fn test_missing_king_rejected() {
        let position = BoardBuilder::new()
            .piece(sq("e1"), Color::White, PieceKind::King)
            .piece(sq("e8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let no_king = Team::new(Color::White, Vec::new(), &position.board);
        assert_eq!(
            no_king,
            Err(SetupError::KingCount {
                team: Color::White,
                found: 0
            })
        );
    }

    #[test]
    fn test_pinned_capture_is_pseudo_legal_only() {
        // The white rook on e2 is pinned by the black rook on e8; taking the
        // knight on a2 would expose the king.
        let mut position = BoardBuilder::new()
            .piece(sq("e1"), Color::White, PieceKind::King)
            .piece(sq("e2"), Color::White, PieceKind::Rook)
            .piece(sq("e8"), Color::Black, PieceKind::Rook)
            .piece(sq("a2"), Color::Black, PieceKind::Knight)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let rook = position.board.get(sq("e2")).unwrap();
        let capture = (rook, Move::capture(sq("a2")));

        let all = position.white.compute_all_moves(&position.board);
        assert!(all.contains(&capture));

        let valid = position
            .white
            .compute_valid_moves(&mut position.board, &mut position.black);
        assert!(!valid.contains(&capture));
        // Moving along the pin stays legal.
        assert!(valid.contains(&(rook, Move::capture(sq("e8")))));
    }

    #[test]
    fn test_valid_moves_put_captures_first() {
        let mut position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("d4"), Color::White, PieceKind::Queen)
            .piece(sq("d7"), Color::Black, PieceKind::Pawn)
            .piece(sq("h6"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let valid = position
            .white
            .compute_valid_moves(&mut position.board, &mut position.black);
        assert!(valid[0].1.can_capture);
        assert_eq!(valid[0].1.destination, sq("d7"));
        assert!(valid[1..].iter().all(|(_, mv)| !mv.can_capture));
    }

    #[test]
    fn test_in_check() {
        let position = BoardBuilder::new()
            .piece(sq("e1"), Color::White, PieceKind::King)
            .piece(sq("e8"), Color::Black, PieceKind::Rook)
            .piece(sq("a8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        assert!(position
            .white
            .in_check(&position.board, position.black.pieces()));
        assert!(!position
            .black
            .in_check(&position.board, position.white.pieces()));
    }

    #[test]
    fn test_sort_pieces_by_values() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        position
            .white
            .sort_pieces(&position.board, &PieceValues::LATE);
        let first = position.board.piece(position.white.pieces()[0]);
        assert_eq!(first.kind(), PieceKind::King);
        let last = position.board.piece(*position.white.pieces().last().unwrap());
        assert_eq!(last.kind(), PieceKind::Pawn);

        position
            .white
            .sort_pieces(&position.board, &PieceValues::EARLY);
        let first = position.board.piece(position.white.pieces()[0]);
        assert_eq!(first.kind(), PieceKind::Knight);
    }

    #[test]
    fn test_pawn_attacks_diagonals_not_pushes() {
        let position = BoardBuilder::new()
            .piece(sq("e4"), Color::Black, PieceKind::Pawn)
            .piece(sq("f3"), Color::White, PieceKind::Knight)
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let black = position.black.pieces();
        // Empty d3 and occupied f3 are both attacked; the push square is not.
        assert!(Team::is_attacked(&position.board, sq("d3"), black));
        assert!(Team::is_attacked(&position.board, sq("f3"), black));
        assert!(!Team::is_attacked(&position.board, sq("e3"), black));
        assert!(!Team::is_attacked(&position.board, sq("d5"), black));
    }
}
