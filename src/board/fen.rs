//! FEN import and export.
//!
//! Only the placement and side-to-move fields are interpreted; castling and
//! en-passant fields are accepted and ignored on load, and written as `-` on
//! export. The first placement rank is row 0 (rank 8).

use std::fmt::Write as _;

use super::error::FenError;
use super::{
    Board, BoardBuilder, BoardView, Color, Coordinate, PieceKind, Position, SquareMap, Squares,
    BOARD_SIZE,
};

/// The standard initial position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 1 1";

/// Parse a FEN string into a position and the side to move.
pub fn load(fen: &str) -> Result<(Position<SquareMap>, Color), FenError> {
    load_as(fen)
}

/// Parse a FEN string into a position with square storage `S`.
pub fn load_as<S: Squares>(fen: &str) -> Result<(Position<S>, Color), FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(FenError::TooFewParts { found: parts.len() });
    }

    let side = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::InvalidSideToMove {
                found: other.to_string(),
            })
        }
    };

    let placement = parts[0].strip_suffix('/').unwrap_or(parts[0]);
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != BOARD_SIZE as usize {
        return Err(FenError::InvalidRankCount { found: ranks.len() });
    }

    let mut builder = BoardBuilder::new();
    for (y, rank) in ranks.iter().enumerate() {
        let mut x = 0usize;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                x += skip as usize;
                continue;
            }
            let kind = PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            let team = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            if x >= BOARD_SIZE as usize {
                return Err(FenError::TooManyFiles {
                    rank: y,
                    files: x + 1,
                });
            }
            builder = builder.piece(Coordinate::new(x as i16, y as i16), team, kind);
            x += 1;
        }
        if x > BOARD_SIZE as usize {
            return Err(FenError::TooManyFiles { rank: y, files: x });
        }
    }

    Ok((builder.build_as()?, side))
}

/// Write the placement of `board` and `side` as a FEN string.
#[must_use]
pub fn construct<S: Squares>(board: &Board<S>, side: Color) -> String {
    let mut fen = String::new();
    for y in 0..board.size() {
        let mut empty = 0;
        for x in 0..board.size() {
            match board.occupant(Coordinate::new(x, y)) {
                Some(occupant) => {
                    if empty > 0 {
                        let _ = write!(fen, "{empty}");
                        empty = 0;
                    }
                    fen.push(occupant.kind.to_fen_char(occupant.team));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            let _ = write!(fen, "{empty}");
        }
        if y + 1 < board.size() {
            fen.push('/');
        }
    }
    let side = match side {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let _ = write!(fen, " {side} - - 1 1");
    fen
}
