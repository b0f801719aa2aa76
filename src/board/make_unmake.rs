//! Make/unmake as a scoped guard.

use super::{Board, BoardView, Coordinate, HistoryEntry, PieceId, SquareMap, Squares};
use crate::team::Team;

/// A trial move applied to a board and the opposing team.
///
/// Creating the guard captures any enemy on the destination (removing it
/// from `enemy`), moves the piece and appends the move to the history.
/// Dropping it puts everything back exactly: squares, the piece's position
/// and position history, the captured piece's liveness and its slot in the
/// enemy list, and the length of the move history. Guards nest; each one only
/// undoes its own move. Trial moves never log.
pub struct ReversibleMove<'a, S: Squares = SquareMap> {
    board: &'a mut Board<S>,
    enemy: &'a mut Team,
    piece: PieceId,
    origin: Coordinate,
    destination: Coordinate,
    piece_history_len: usize,
    history_len: usize,
    captured: Option<(PieceId, Option<usize>)>,
}

impl<'a, S: Squares> ReversibleMove<'a, S> {
    /// Apply `piece` to `destination`.
    ///
    /// # Panics
    /// If `destination` is off the board or holds a piece of the mover's team.
    pub fn apply(
        board: &'a mut Board<S>,
        enemy: &'a mut Team,
        piece: PieceId,
        destination: Coordinate,
    ) -> Self {
        let (origin, piece_history_len, team) = {
            let p = board.piece(piece);
            (p.position(), p.position_history().len(), p.team())
        };
        let history_len = board.move_history().len();

        let mut captured = None;
        if board.is_enemy(destination, team) {
            if let Some(victim) = board.capture_at(destination, false) {
                let slot = enemy.pieces.iter().position(|&p| p == victim);
                if let Some(i) = slot {
                    enemy.pieces.remove(i);
                }
                captured = Some((victim, slot));
            }
        }

        board.relocate(piece, destination);
        board.push_history(HistoryEntry {
            piece,
            destination,
            was_capture: captured.is_some(),
        });

        ReversibleMove {
            board,
            enemy,
            piece,
            origin,
            destination,
            piece_history_len,
            history_len,
            captured,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board<S> {
        &*self.board
    }

    #[inline]
    pub fn board_mut(&mut self) -> &mut Board<S> {
        &mut *self.board
    }

    #[inline]
    pub fn enemy(&self) -> &Team {
        &*self.enemy
    }

    /// Both borrows at once, for recursing into the position.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut Board<S>, &mut Team) {
        (&mut *self.board, &mut *self.enemy)
    }

    /// The piece this move captured, if any.
    #[inline]
    pub fn captured(&self) -> Option<PieceId> {
        self.captured.map(|(id, _)| id)
    }
}

impl<S: Squares> Drop for ReversibleMove<'_, S> {
    fn drop(&mut self) {
        self.board.clear_square(self.destination);
        {
            let piece = self.board.piece_mut(self.piece);
            piece.position = self.origin;
            piece.position_history.truncate(self.piece_history_len);
        }
        if let Some((victim, slot)) = self.captured {
            self.board.piece_mut(victim).captured = false;
            self.board.place(victim);
            if let Some(i) = slot {
                self.enemy.pieces.insert(i, victim);
            }
        }
        self.board.place(self.piece);
        self.board.truncate_history(self.history_len);
    }
}
