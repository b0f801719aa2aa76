//! Fluent builder for constructing positions.
//!
//! Allows creating positions piece by piece rather than parsing FEN strings.
//!
//! # Example
//! ```
//! use minimax_chess::board::{BoardBuilder, Color, Coordinate, PieceKind};
//!
//! let position = BoardBuilder::new()
//!     .piece(Coordinate::new(4, 7), Color::White, PieceKind::King)
//!     .piece(Coordinate::new(4, 0), Color::Black, PieceKind::King)
//!     .piece(Coordinate::new(0, 6), Color::White, PieceKind::Pawn)
//!     .build()
//!     .unwrap();
//! assert_eq!(position.white.pieces().len(), 2);
//! ```

use super::{Board, Color, Coordinate, Piece, PieceKind, SetupError, SquareMap, Squares, BOARD_SIZE};
use crate::team::Team;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A board together with both teams.
#[derive(Clone, Debug)]
pub struct Position<S: Squares = SquareMap> {
    pub board: Board<S>,
    pub white: Team,
    pub black: Team,
}

impl<S: Squares> Position<S> {
    /// Build both teams from the live pieces on `board`.
    pub fn from_board(board: Board<S>) -> Result<Self, SetupError> {
        let white = Team::from_board(Color::White, &board)?;
        let black = Team::from_board(Color::Black, &board)?;
        Ok(Position {
            board,
            white,
            black,
        })
    }

    #[must_use]
    pub fn team(&self, color: Color) -> &Team {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// The board, the team of `mover` and its opponent, borrowed together.
    pub fn split_mut(&mut self, mover: Color) -> (&mut Board<S>, &mut Team, &mut Team) {
        match mover {
            Color::White => (&mut self.board, &mut self.white, &mut self.black),
            Color::Black => (&mut self.board, &mut self.black, &mut self.white),
        }
    }
}

/// A fluent builder for [`Position`]s.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    size: i16,
    pieces: Vec<(Coordinate, Color, PieceKind)>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    /// Create a new empty 8x8 builder.
    #[must_use]
    pub fn new() -> Self {
        BoardBuilder {
            size: BOARD_SIZE,
            pieces: Vec::new(),
        }
    }

    /// Create an empty builder for a board of edge `size`.
    #[must_use]
    pub fn with_size(size: i16) -> Self {
        BoardBuilder {
            size,
            pieces: Vec::new(),
        }
    }

    /// Create a builder starting from the standard initial position.
    #[must_use]
    pub fn starting_position() -> Self {
        let mut builder = Self::new();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let x = file as i16;
            builder.pieces.push((Coordinate::new(x, 0), Color::Black, kind));
            builder
                .pieces
                .push((Coordinate::new(x, 1), Color::Black, PieceKind::Pawn));
            builder
                .pieces
                .push((Coordinate::new(x, 6), Color::White, PieceKind::Pawn));
            builder.pieces.push((Coordinate::new(x, 7), Color::White, kind));
        }
        builder
    }

    /// Place a piece, replacing whatever was on the square.
    #[must_use]
    pub fn piece(mut self, square: Coordinate, color: Color, kind: PieceKind) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self.pieces.push((square, color, kind));
        self
    }

    /// Remove a piece from a square.
    #[must_use]
    pub fn clear(mut self, square: Coordinate) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self
    }

    /// Build with the default square storage.
    pub fn build(self) -> Result<Position<SquareMap>, SetupError> {
        self.build_as()
    }

    /// Build with the square storage `S`.
    ///
    /// Fails if a piece lies off the board, the size is unsupported, or a
    /// team does not have exactly one king.
    pub fn build_as<S: Squares>(self) -> Result<Position<S>, SetupError> {
        let size = self.size;
        let pieces = self
            .pieces
            .into_iter()
            .map(|(square, color, kind)| Piece::with_board_size(kind, color, square, size))
            .collect();
        let board = Board::with_size(size, pieces)?;
        Position::from_board(board)
    }
}
