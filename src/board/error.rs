//! Error types for position setup and move requests.

use std::fmt;

use super::{Color, Coordinate};

/// Error type for square notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// Not a square between `a1` and `h8`
    InvalidNotation { notation: String },
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs placement and side to move)
    TooFewParts { found: usize },
    /// Invalid piece character in the placement field
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Placement field does not describe eight ranks
    InvalidRankCount { found: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// The placement parsed but is not a playable position
    Setup(SetupError),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 2 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::Setup(err) => write!(f, "Invalid FEN position: {err}"),
        }
    }
}

impl std::error::Error for FenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FenError::Setup(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SetupError> for FenError {
    fn from(err: SetupError) -> Self {
        FenError::Setup(err)
    }
}

/// Error type for structurally unsound positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// A team does not have exactly one king
    KingCount { team: Color, found: usize },
    /// Two pieces were placed on the same square
    SquareOccupied { square: Coordinate },
    /// A piece was placed off the board
    OffBoard { square: Coordinate },
    /// Board edge outside the supported range
    UnsupportedSize { size: i16 },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::KingCount { team, found } => {
                write!(f, "{team} must have exactly one king, found {found}")
            }
            SetupError::SquareOccupied { square } => {
                write!(f, "Square {square} holds more than one piece")
            }
            SetupError::OffBoard { square } => {
                write!(f, "Square {square} is not on the board")
            }
            SetupError::UnsupportedSize { size } => {
                write!(f, "Board size {size} is not supported (must be 1-8)")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Error type for rejected move requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Square notation could not be parsed
    InvalidSquare(CoordinateError),
    /// No piece of the side to move on the source square
    NoPiece { square: Coordinate },
    /// The piece cannot reach the destination
    Unreachable { from: Coordinate, to: Coordinate },
    /// The move would leave the mover's king in check
    LeavesKingInCheck { from: Coordinate, to: Coordinate },
    /// Castling is not allowed here
    IllegalCastle { from: Coordinate, to: Coordinate },
    /// The game has already ended
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidSquare(err) => write!(f, "{err}"),
            MoveError::NoPiece { square } => {
                write!(f, "Square {square} does not hold a piece of the side to move")
            }
            MoveError::Unreachable { from, to } => {
                write!(f, "Piece on {from} cannot move to {to}")
            }
            MoveError::LeavesKingInCheck { from, to } => {
                write!(f, "Moving {from} to {to} leaves the king in check")
            }
            MoveError::IllegalCastle { from, to } => {
                write!(f, "King on {from} cannot castle to {to}")
            }
            MoveError::GameOver => write!(f, "The game is over"),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::InvalidSquare(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoordinateError> for MoveError {
    fn from(err: CoordinateError) -> Self {
        MoveError::InvalidSquare(err)
    }
}
