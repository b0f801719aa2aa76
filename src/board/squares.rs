//! Square storage backends for [`Board`](super::Board).
//!
//! `SquareMap` keeps one optional piece handle per square. `PackedSquares`
//! keeps four bits per square in a 256-bit integer: the low three bits are
//! the piece code (0 = empty) and the high bit is the team. A byte per square
//! beside the bits maps the square back to its piece handle.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Color, Coordinate, Occupant, Piece, PieceId, PieceKind};
use crate::zobrist::{hash_occupants, HashTable, PositionHash};

/// Storage for the contents of each square.
///
/// Indices are row-major square indices (`y * size + x`) and are always on
/// the board; the board checks bounds before calling in.
pub trait Squares: Clone + fmt::Debug + Send + Sync {
    /// Empty storage for a board of edge `size`.
    fn with_size(size: i16) -> Self;

    fn is_occupied(&self, index: usize) -> bool;

    fn team_at(&self, index: usize, pieces: &[Piece]) -> Option<Color>;

    fn occupant(&self, index: usize, pieces: &[Piece]) -> Option<Occupant>;

    /// Handle of the live piece on `square`.
    fn piece_at(&self, square: Coordinate, index: usize, pieces: &[Piece]) -> Option<PieceId>;

    fn place(&mut self, index: usize, id: PieceId, occupant: Occupant);

    fn clear(&mut self, index: usize);

    /// Full position hash.
    fn position_hash(&self, size: i16, pieces: &[Piece], table: &HashTable) -> PositionHash;

    /// Position hash after `changed` squares were modified, given the hash
    /// from before.
    fn update_position_hash(
        &self,
        hash: PositionHash,
        size: i16,
        pieces: &[Piece],
        table: &HashTable,
        changed: &[Coordinate],
    ) -> PositionHash {
        let bits = table.bits_per_square();
        if bits == 0 {
            return hash;
        }
        let mut hash = hash;
        for &square in changed {
            let index = square.index(size);
            let shift = index * bits as usize;
            hash.clear_field(shift, bits);
            if let Some(occupant) = self.occupant(index, pieces) {
                hash.xor_at(shift, table.value(occupant));
            }
        }
        hash
    }
}

/// One optional piece handle per square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareMap {
    cells: Vec<Option<PieceId>>,
}

impl Squares for SquareMap {
    fn with_size(size: i16) -> Self {
        let count = (size as usize) * (size as usize);
        SquareMap {
            cells: vec![None; count],
        }
    }

    #[inline]
    fn is_occupied(&self, index: usize) -> bool {
        self.cells[index].is_some()
    }

    #[inline]
    fn team_at(&self, index: usize, pieces: &[Piece]) -> Option<Color> {
        self.cells[index].map(|id| pieces[id.0].team())
    }

    #[inline]
    fn occupant(&self, index: usize, pieces: &[Piece]) -> Option<Occupant> {
        self.cells[index].map(|id| pieces[id.0].occupant())
    }

    #[inline]
    fn piece_at(&self, _square: Coordinate, index: usize, _pieces: &[Piece]) -> Option<PieceId> {
        self.cells[index]
    }

    #[inline]
    fn place(&mut self, index: usize, id: PieceId, _occupant: Occupant) {
        self.cells[index] = Some(id);
    }

    #[inline]
    fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    fn position_hash(&self, _size: i16, pieces: &[Piece], table: &HashTable) -> PositionHash {
        let occupants = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|id| (index, pieces[id.0].occupant())));
        hash_occupants(occupants, table)
    }
}

const BITS_PER_SQUARE: usize = 4;
const PIECE_MASK: u64 = 0b0111;
const TEAM_BIT: u64 = 0b1000;
const SQUARE_MASK: u64 = PIECE_MASK | TEAM_BIT;

/// Largest board edge the packed representation can hold.
pub const MAX_PACKED_SIZE: i16 = 8;

fn piece_code(kind: PieceKind) -> u64 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Rook => 2,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 4,
        PieceKind::Queen => 5,
        PieceKind::King => 6,
    }
}

fn kind_from_code(code: u64) -> Option<PieceKind> {
    match code {
        1 => Some(PieceKind::Pawn),
        2 => Some(PieceKind::Rook),
        3 => Some(PieceKind::Knight),
        4 => Some(PieceKind::Bishop),
        5 => Some(PieceKind::Queen),
        6 => Some(PieceKind::King),
        _ => None,
    }
}

/// Squares the packed representation can hold.
const PACKED_SQUARES: usize = (MAX_PACKED_SIZE as usize) * (MAX_PACKED_SIZE as usize);

/// Handle slot for a square whose piece is not indexed.
const NO_HANDLE: u8 = 0;

/// Four bits per square packed into a 256-bit integer.
///
/// Equality and hashing look at the packed bits only.
#[derive(Clone, Copy, Debug)]
pub struct PackedSquares {
    bits: PositionHash,
    /// `PieceId + 1` per square, [`NO_HANDLE`] when empty.
    handles: [u8; PACKED_SQUARES],
}

impl Default for PackedSquares {
    fn default() -> Self {
        PackedSquares {
            bits: PositionHash::default(),
            handles: [NO_HANDLE; PACKED_SQUARES],
        }
    }
}

impl PartialEq for PackedSquares {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for PackedSquares {}

impl Hash for PackedSquares {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl PackedSquares {
    #[inline]
    fn nibble(&self, index: usize) -> u64 {
        self.bits.field(index * BITS_PER_SQUARE, BITS_PER_SQUARE as u32)
    }

    /// The raw packed integer.
    #[inline]
    #[must_use]
    pub fn bit_representation(&self) -> PositionHash {
        self.bits
    }
}

impl Squares for PackedSquares {
    fn with_size(size: i16) -> Self {
        assert!(
            (1..=MAX_PACKED_SIZE).contains(&size),
            "packed board supports edges up to {MAX_PACKED_SIZE}, got {size}"
        );
        PackedSquares::default()
    }

    #[inline]
    fn is_occupied(&self, index: usize) -> bool {
        self.nibble(index) & PIECE_MASK != 0
    }

    #[inline]
    fn team_at(&self, index: usize, _pieces: &[Piece]) -> Option<Color> {
        let nibble = self.nibble(index);
        if nibble & PIECE_MASK == 0 {
            return None;
        }
        Some(if nibble & TEAM_BIT == 0 {
            Color::White
        } else {
            Color::Black
        })
    }

    #[inline]
    fn occupant(&self, index: usize, _pieces: &[Piece]) -> Option<Occupant> {
        let nibble = self.nibble(index);
        let kind = kind_from_code(nibble & PIECE_MASK)?;
        let team = if nibble & TEAM_BIT == 0 {
            Color::White
        } else {
            Color::Black
        };
        Some(Occupant::new(kind, team))
    }

    /// Read from the handle index. An arena too large for a byte handle
    /// falls back to a scan of the live pieces.
    fn piece_at(&self, square: Coordinate, index: usize, pieces: &[Piece]) -> Option<PieceId> {
        if !self.is_occupied(index) {
            return None;
        }
        match self.handles[index] {
            NO_HANDLE => pieces
                .iter()
                .position(|p| !p.is_captured() && p.position() == square)
                .map(PieceId),
            handle => Some(PieceId(usize::from(handle) - 1)),
        }
    }

    #[inline]
    fn place(&mut self, index: usize, id: PieceId, occupant: Occupant) {
        let team = match occupant.team {
            Color::White => 0,
            Color::Black => TEAM_BIT,
        };
        self.clear(index);
        self.bits
            .xor_at(index * BITS_PER_SQUARE, (piece_code(occupant.kind) | team) & SQUARE_MASK);
        self.handles[index] = u8::try_from(id.0 + 1).unwrap_or(NO_HANDLE);
    }

    #[inline]
    fn clear(&mut self, index: usize) {
        self.bits
            .clear_field(index * BITS_PER_SQUARE, BITS_PER_SQUARE as u32);
        self.handles[index] = NO_HANDLE;
    }

    /// The packed integer already identifies the square contents.
    fn position_hash(&self, _size: i16, _pieces: &[Piece], _table: &HashTable) -> PositionHash {
        self.bits
    }

    fn update_position_hash(
        &self,
        _hash: PositionHash,
        _size: i16,
        _pieces: &[Piece],
        _table: &HashTable,
        _changed: &[Coordinate],
    ) -> PositionHash {
        self.bits
    }
}
