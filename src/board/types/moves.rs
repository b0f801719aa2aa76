//! Generated move type.

use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// A destination produced by move generation.
///
/// Identity is the destination alone: `can_capture` is metadata used for
/// ordering and evaluation, so two moves to the same square compare equal.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub destination: Coordinate,
    pub can_capture: bool,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn quiet(destination: Coordinate) -> Self {
        Move {
            destination,
            can_capture: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn capture(destination: Coordinate) -> Self {
        Move {
            destination,
            can_capture: true,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.destination == other.destination
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.destination.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.can_capture {
            write!(f, "x{}", self.destination)
        } else {
            write!(f, "{}", self.destination)
        }
    }
}
