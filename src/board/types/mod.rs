//! Core value types.
//!
//! - `Coordinate` - an `(x, y)` square
//! - `Move` - a generated destination with its capture flag
//! - `Piece`, `PieceKind`, `Color`, `Occupant`, `PieceId` - pieces and teams

mod coordinate;
mod moves;
mod piece;

pub use coordinate::{Coordinate, BOARD_SIZE};
pub use moves::Move;
pub use piece::{
    Color, Occupant, Piece, PieceId, PieceKind, PieceVariant, QUEEN_DEPTH_BUDGET,
    QUEEN_DEPTH_EXTENSION,
};
