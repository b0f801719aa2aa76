//! Board representation and move rules.
//!
//! A [`Board`] owns every piece of a game in an arena that never shrinks:
//! captured pieces stay in the arena, marked captured, so a reversible move
//! can reinstate them. Squares refer to pieces by [`PieceId`]. The square
//! storage is pluggable through [`Squares`]; [`BitBoard`] is the packed
//! 4-bit-per-square variant and behaves identically to the default map.
//!
//! # Example
//! ```
//! use minimax_chess::board::{BoardBuilder, BoardView, Coordinate};
//!
//! let position = BoardBuilder::starting_position().build().unwrap();
//! let e2: Coordinate = "e2".parse().unwrap();
//! let pawn = position.board.get(e2).unwrap();
//! let moves = position.board.piece(pawn).compute_valid_moves(&position.board);
//! assert_eq!(moves.len(), 2);
//! ```

mod builder;
mod display;
mod error;
pub mod fen;
mod make_unmake;
mod movegen;
mod squares;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{BoardBuilder, Position};
pub use error::{CoordinateError, FenError, MoveError, SetupError};
pub use make_unmake::ReversibleMove;
pub use movegen::MoveRule;
pub use squares::{PackedSquares, SquareMap, Squares, MAX_PACKED_SIZE};
pub use types::{
    Color, Coordinate, Move, Occupant, Piece, PieceId, PieceKind, PieceVariant, BOARD_SIZE,
    QUEEN_DEPTH_BUDGET, QUEEN_DEPTH_EXTENSION,
};

use crate::zobrist::{HashTable, PositionHash};

/// Half-moves without a pawn move or capture that draw the game.
pub const FIFTY_MOVE_WINDOW: usize = 100;

/// Board backed by the packed 4-bit-per-square storage.
pub type BitBoard = Board<PackedSquares>;

/// Read-only view of square contents, all move rules need.
pub trait BoardView {
    /// Edge length.
    fn size(&self) -> i16;

    /// Kind and team on `pos`, `None` if empty or off the board.
    fn occupant(&self, pos: Coordinate) -> Option<Occupant>;

    #[inline]
    fn is_on_board(&self, pos: Coordinate) -> bool {
        pos.within(self.size())
    }

    #[inline]
    fn is_empty_at(&self, pos: Coordinate) -> bool {
        self.occupant(pos).is_none()
    }

    /// True if `pos` holds a piece that does not belong to `team`.
    #[inline]
    fn is_enemy(&self, pos: Coordinate, team: Color) -> bool {
        matches!(self.occupant(pos), Some(occupant) if occupant.team != team)
    }
}

/// One entry of the game's move history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub piece: PieceId,
    pub destination: Coordinate,
    pub was_capture: bool,
}

/// The board: piece arena, square contents and move history.
#[derive(Clone, Debug)]
pub struct Board<S: Squares = SquareMap> {
    size: i16,
    pieces: Vec<Piece>,
    squares: S,
    move_history: Vec<HistoryEntry>,
}

impl<S: Squares> Board<S> {
    /// Standard 8x8 board holding `pieces`.
    pub fn new(pieces: Vec<Piece>) -> Result<Self, SetupError> {
        Board::with_size(BOARD_SIZE, pieces)
    }

    /// Board of edge `size` holding `pieces`. Captured pieces are kept in the
    /// arena but not placed.
    pub fn with_size(size: i16, pieces: Vec<Piece>) -> Result<Self, SetupError> {
        if !(1..=MAX_PACKED_SIZE).contains(&size) {
            return Err(SetupError::UnsupportedSize { size });
        }
        let mut board = Board {
            size,
            pieces,
            squares: S::with_size(size),
            move_history: Vec::new(),
        };
        for i in 0..board.pieces.len() {
            let piece = &board.pieces[i];
            if piece.is_captured() {
                continue;
            }
            let square = piece.position();
            if !square.within(size) {
                return Err(SetupError::OffBoard { square });
            }
            let index = square.index(size);
            if board.squares.is_occupied(index) {
                return Err(SetupError::SquareOccupied { square });
            }
            let occupant = piece.occupant();
            board.squares.place(index, PieceId(i), occupant);
        }
        Ok(board)
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> i16 {
        self.size
    }

    /// Handle of the piece on `pos`. `None` for empty and off-board squares.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: Coordinate) -> Option<PieceId> {
        if !pos.within(self.size) {
            return None;
        }
        self.squares
            .piece_at(pos, pos.index(self.size), &self.pieces)
    }

    /// # Panics
    /// If `id` does not belong to this board.
    #[inline]
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.0]
    }

    /// The whole arena, captured pieces included.
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Live pieces of `team`, in arena order.
    #[must_use]
    pub fn team_pieces(&self, team: Color) -> Vec<PieceId> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.team() == team && !p.is_captured())
            .map(|(i, _)| PieceId(i))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn move_history(&self) -> &[HistoryEntry] {
        &self.move_history
    }

    #[inline]
    fn index_of(&self, pos: Coordinate) -> usize {
        assert!(
            pos.within(self.size),
            "square {pos} is off the {0}x{0} board",
            self.size
        );
        pos.index(self.size)
    }

    /// Move `id` to the empty square `dest`, pushing `dest` onto its position
    /// history. With `record` the move is appended to the move history.
    ///
    /// # Panics
    /// If `dest` is off the board or occupied, or the piece is captured.
    pub fn move_piece(&mut self, id: PieceId, dest: Coordinate, was_capture: bool, record: bool) {
        self.relocate(id, dest);
        if record {
            self.move_history.push(HistoryEntry {
                piece: id,
                destination: dest,
                was_capture,
            });
        }
    }

    /// Remove the piece on `pos` and mark it captured. The move history is
    /// left alone; `record` is accepted for symmetry with the other mutators.
    ///
    /// # Panics
    /// If `pos` is off the board.
    pub fn capture_at(&mut self, pos: Coordinate, _record: bool) -> Option<PieceId> {
        let index = self.index_of(pos);
        let id = self.squares.piece_at(pos, index, &self.pieces)?;
        self.squares.clear(index);
        self.pieces[id.0].captured = true;
        Some(id)
    }

    /// Capture the enemy on `dest`, if any, removing it from `enemy_pieces`,
    /// then move `id` there.
    ///
    /// # Panics
    /// If `dest` is off the board or holds a piece of the mover's team.
    pub fn move_piece_and_capture(
        &mut self,
        dest: Coordinate,
        id: PieceId,
        enemy_pieces: &mut Vec<PieceId>,
        record: bool,
    ) -> Option<PieceId> {
        let team = self.pieces[id.0].team();
        let captured = if self.is_enemy(dest, team) {
            self.capture_at(dest, record)
        } else {
            None
        };
        if let Some(victim) = captured {
            enemy_pieces.retain(|&p| p != victim);
        }
        self.move_piece(id, dest, captured.is_some(), record);
        captured
    }

    /// Move `id` to `dest` without touching the move history.
    pub(crate) fn relocate(&mut self, id: PieceId, dest: Coordinate) {
        let dest_index = self.index_of(dest);
        let piece = &self.pieces[id.0];
        assert!(!piece.is_captured(), "{piece} is captured and cannot move");
        assert!(
            !self.squares.is_occupied(dest_index),
            "cannot move {piece} onto occupied square {dest}"
        );
        let from_index = self.index_of(piece.position());
        self.squares.clear(from_index);
        let piece = &mut self.pieces[id.0];
        piece.move_to(dest);
        let occupant = piece.occupant();
        self.squares.place(dest_index, id, occupant);
    }

    /// Put `id` back on its current position.
    pub(crate) fn place(&mut self, id: PieceId) {
        let piece = &self.pieces[id.0];
        let index = self.index_of(piece.position());
        let occupant = piece.occupant();
        self.squares.place(index, id, occupant);
    }

    pub(crate) fn clear_square(&mut self, pos: Coordinate) {
        let index = self.index_of(pos);
        self.squares.clear(index);
    }

    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.move_history.push(entry);
    }

    pub(crate) fn truncate_history(&mut self, len: usize) {
        self.move_history.truncate(len);
    }

    /// True if the last `repetitions * teams * 2` history entries consist of
    /// exactly `teams * 2` distinct moves.
    #[must_use]
    pub fn is_draw_by_repetition(&self, repetitions: usize, teams: usize) -> bool {
        let window = repetitions * teams * 2;
        let cycle = teams * 2;
        if window == 0 || self.move_history.len() < window {
            return false;
        }
        let tail = &self.move_history[self.move_history.len() - window..];
        let mut distinct: Vec<&HistoryEntry> = Vec::with_capacity(cycle + 1);
        for entry in tail {
            if !distinct.contains(&entry) {
                distinct.push(entry);
                if distinct.len() > cycle {
                    return false;
                }
            }
        }
        distinct.len() == cycle
    }

    /// True if none of the last hundred half-moves moved a pawn or captured.
    #[must_use]
    pub fn is_draw_by_fifty_moves(&self) -> bool {
        let len = self.move_history.len();
        if len < FIFTY_MOVE_WINDOW {
            return false;
        }
        self.move_history[len - FIFTY_MOVE_WINDOW..]
            .iter()
            .all(|e| !e.was_capture && self.pieces[e.piece.0].kind() != PieceKind::Pawn)
    }

    /// Threefold repetition between two teams, or the fifty-move rule.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_draw_by_repetition(3, 2) || self.is_draw_by_fifty_moves()
    }

    /// Full position hash.
    #[must_use]
    pub fn position_hash(&self, table: &HashTable) -> PositionHash {
        self.squares.position_hash(self.size, &self.pieces, table)
    }

    /// `hash` updated for the `changed` squares.
    #[must_use]
    pub fn update_position_hash(
        &self,
        hash: PositionHash,
        table: &HashTable,
        changed: &[Coordinate],
    ) -> PositionHash {
        self.squares
            .update_position_hash(hash, self.size, &self.pieces, table, changed)
    }
}

impl Board<PackedSquares> {
    /// The packed 256-bit square contents.
    #[inline]
    #[must_use]
    pub fn bit_representation(&self) -> PositionHash {
        self.squares.bit_representation()
    }
}

impl<S: Squares> BoardView for Board<S> {
    #[inline]
    fn size(&self) -> i16 {
        self.size
    }

    #[inline]
    fn occupant(&self, pos: Coordinate) -> Option<Occupant> {
        if !pos.within(self.size) {
            return None;
        }
        self.squares.occupant(pos.index(self.size), &self.pieces)
    }

    #[inline]
    fn is_empty_at(&self, pos: Coordinate) -> bool {
        !pos.within(self.size) || !self.squares.is_occupied(pos.index(self.size))
    }

    #[inline]
    fn is_enemy(&self, pos: Coordinate, team: Color) -> bool {
        pos.within(self.size)
            && matches!(
                self.squares.team_at(pos.index(self.size), &self.pieces),
                Some(other) if other != team
            )
    }
}
