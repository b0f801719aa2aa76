//! Board coordinates.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::CoordinateError;

/// Default board edge length.
pub const BOARD_SIZE: i16 = 8;

/// A square on the board as `(x, y)`.
///
/// `x` is the file (a = 0). `y` counts rows from the top of the board, so on
/// the standard board `a8` is `(0, 0)` and `a1` is `(0, 7)`. Coordinates may be
/// constructed off the board; `Board::is_on_board` is the sanctioned check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub x: i16,
    pub y: i16,
}

impl Coordinate {
    #[inline]
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Coordinate { x, y }
    }

    /// Shift by `(dx, dy)` without bounds checking.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i16, dy: i16) -> Self {
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// True if both axes are in `[0, size)`.
    #[inline]
    #[must_use]
    pub const fn within(self, size: i16) -> bool {
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }

    /// Row-major square index (`y * size + x`). Only meaningful on the board.
    #[inline]
    #[must_use]
    pub const fn index(self, size: i16) -> usize {
        (self.y * size + self.x) as usize
    }

    /// Inverse of [`Coordinate::index`].
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize, size: i16) -> Self {
        let size = size as usize;
        Coordinate::new((idx % size) as i16, (idx / size) as i16)
    }

    /// True if both coordinates lie on a common diagonal.
    #[inline]
    #[must_use]
    pub fn is_diagonal_to(self, other: Coordinate) -> bool {
        (self.x - other.x).abs() == (self.y - other.y).abs()
    }

    /// True if both coordinates share a rank or a file.
    #[inline]
    #[must_use]
    pub fn is_straight_to(self, other: Coordinate) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Chebyshev distance.
    #[inline]
    #[must_use]
    pub fn king_distance(self, other: Coordinate) -> i16 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Euclidean distance, used by the distance evaluations.
    #[must_use]
    pub fn distance(self, other: Coordinate) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add<(i16, i16)> for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn add(self, (dx, dy): (i16, i16)) -> Coordinate {
        self.offset(dx, dy)
    }
}

impl From<(i16, i16)> for Coordinate {
    fn from((x, y): (i16, i16)) -> Self {
        Coordinate::new(x, y)
    }
}

/// Algebraic name on the standard board (`(0, 7)` -> `a1`).
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.within(BOARD_SIZE) {
            return write!(f, "({}, {})", self.x, self.y);
        }
        write!(f, "{}{}", (self.x as u8 + b'a') as char, BOARD_SIZE - self.y)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordinateError::InvalidNotation {
            notation: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }

        let x = i16::from(file - b'a');
        let y = BOARD_SIZE - i16::from(rank - b'0');
        Ok(Coordinate::new(x, y))
    }
}
