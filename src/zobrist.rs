//! Position hashing.
//!
//! Every distinct `(kind, team)` representation present in a game gets a small
//! value `1..=K`. A position hash XORs `value << (square_index * bits)` over
//! the occupied squares, where `bits` is wide enough to hold `K`. With at most
//! twelve representations that is four bits per square, so a 64-square board
//! fits in 256 bits and two positions hash equal exactly when their square
//! contents are equal.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Coordinate, Occupant, Piece, PieceKind, Squares};

/// Number of 64-bit words in a [`PositionHash`].
pub const HASH_WORDS: usize = 4;

/// 256-bit position key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionHash(pub [u64; HASH_WORDS]);

impl PositionHash {
    pub const ZERO: PositionHash = PositionHash([0; HASH_WORDS]);

    /// XOR `value` in at bit offset `shift`. A field may straddle two words.
    #[inline]
    pub fn xor_at(&mut self, shift: usize, value: u64) {
        let word = shift / 64;
        let bit = shift % 64;
        self.0[word] ^= value << bit;
        if bit > 0 && word + 1 < HASH_WORDS {
            self.0[word + 1] ^= value >> (64 - bit);
        }
    }

    /// Read a `width`-bit field at bit offset `shift`.
    #[inline]
    #[must_use]
    pub fn field(&self, shift: usize, width: u32) -> u64 {
        if width == 0 {
            return 0;
        }
        let mask = (1u64 << width) - 1;
        let word = shift / 64;
        let bit = shift % 64;
        let mut value = self.0[word] >> bit;
        if bit > 0 && word + 1 < HASH_WORDS {
            value |= self.0[word + 1] << (64 - bit);
        }
        value & mask
    }

    /// Zero a `width`-bit field at bit offset `shift`.
    #[inline]
    pub fn clear_field(&mut self, shift: usize, width: u32) {
        let current = self.field(shift, width);
        self.xor_at(shift, current);
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

impl fmt::Debug for PositionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionHash({self})")
    }
}

impl fmt::Display for PositionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0.iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

/// Lookup from piece representation to its hash value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashTable {
    // values[kind][team]; 0 means absent
    values: [[u8; 2]; 6],
    len: u8,
    bits: u32,
}

impl HashTable {
    /// Build the table from the pieces of a game. A team with pawns also gets
    /// its queen representation so promoted pawns always have a value.
    #[must_use]
    pub fn from_pieces<'a, I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = &'a Piece>,
    {
        let mut present = [[false; 2]; 6];
        for piece in pieces {
            let team = piece.team().index();
            present[piece.representation().index()][team] = true;
            if piece.kind() == PieceKind::Pawn {
                present[PieceKind::Queen.index()][team] = true;
            }
        }

        let mut values = [[0u8; 2]; 6];
        let mut len = 0u8;
        for kind in PieceKind::ALL {
            for team in Color::BOTH {
                if present[kind.index()][team.index()] {
                    len += 1;
                    values[kind.index()][team.index()] = len;
                }
            }
        }
        let bits = u8::BITS - len.leading_zeros();
        HashTable { values, len, bits }
    }

    /// Build the table from every piece on a board, captured ones included.
    #[must_use]
    pub fn for_board<S: Squares>(board: &Board<S>) -> Self {
        HashTable::from_pieces(board.pieces())
    }

    #[inline]
    #[must_use]
    pub fn value(&self, occupant: Occupant) -> u64 {
        let value = self.values[occupant.kind.index()][occupant.team.index()];
        debug_assert!(value != 0, "{occupant:?} missing from hash table");
        u64::from(value)
    }

    /// Number of distinct representations.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn bits_per_square(&self) -> u32 {
        self.bits
    }
}

/// Full recompute over every square.
#[must_use]
pub fn compute_hash<S: Squares>(board: &Board<S>, table: &HashTable) -> PositionHash {
    board.position_hash(table)
}

/// Incremental update touching only `changed` squares. Equal to
/// [`compute_hash`] of the current board when `hash` was the board's hash
/// before those squares changed.
#[must_use]
pub fn update_hash<S: Squares>(
    hash: PositionHash,
    board: &Board<S>,
    table: &HashTable,
    changed: &[Coordinate],
) -> PositionHash {
    board.update_position_hash(hash, table, changed)
}

/// Hash a sequence of `(square_index, occupant)` pairs.
pub(crate) fn hash_occupants<I>(occupants: I, table: &HashTable) -> PositionHash
where
    I: IntoIterator<Item = (usize, Occupant)>,
{
    let bits = table.bits_per_square() as usize;
    let mut hash = PositionHash::ZERO;
    if bits == 0 {
        return hash;
    }
    for (index, occupant) in occupants {
        hash.xor_at(index * bits, table.value(occupant));
    }
    hash
}
