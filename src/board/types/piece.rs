//! Pieces, piece kinds and teams.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, BOARD_SIZE};
use super::moves::Move;
use crate::board::movegen::{
    MoveRule, BISHOP_RULES, KING_RULES, KNIGHT_RULES, PAWN_DOWN_RULES, PAWN_UP_RULES,
    QUEEN_RULES, ROOK_RULES,
};
use crate::board::BoardView;

/// Extra plies granted by a queen's depth extension.
pub const QUEEN_DEPTH_EXTENSION: u32 = 2;
/// Number of depth extensions each queen may hand out.
pub const QUEEN_DEPTH_BUDGET: u8 = 3;

/// The two sides.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Pawn direction along `y`: white walks towards row 0.
    #[inline]
    #[must_use]
    pub const fn pawn_direction(self) -> i16 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Piece kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Parse from a FEN letter, either case.
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// FEN letter, uppercase for white.
    #[must_use]
    pub fn to_fen_char(self, team: Color) -> char {
        match team {
            Color::White => self.to_char().to_ascii_uppercase(),
            Color::Black => self.to_char(),
        }
    }
}

/// What a square holds, as far as the board contents are concerned: the
/// reported kind (a promoted pawn reports `Queen`) and the team.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Occupant {
    pub kind: PieceKind,
    pub team: Color,
}

impl Occupant {
    #[inline]
    #[must_use]
    pub const fn new(kind: PieceKind, team: Color) -> Self {
        Occupant { kind, team }
    }
}

/// Handle of a piece inside its board's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Per-variant payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PieceVariant {
    Pawn { direction: i16, promotion_row: i16 },
    Knight,
    Bishop,
    Rook,
    Queen { depth_budget: u8 },
    King,
}

/// A piece. Pieces are never destroyed, only marked captured, so a reversible
/// move can reinstate them.
#[derive(Clone, Debug)]
pub struct Piece {
    variant: PieceVariant,
    team: Color,
    pub(crate) position: Coordinate,
    pub(crate) position_history: Vec<Coordinate>,
    pub(crate) captured: bool,
}

impl Piece {
    /// Create a piece for the standard 8x8 board.
    #[must_use]
    pub fn new(kind: PieceKind, team: Color, position: Coordinate) -> Self {
        Piece::with_board_size(kind, team, position, BOARD_SIZE)
    }

    /// Create a piece for a board of edge `size`; only pawns care, since their
    /// promotion row is the far edge.
    #[must_use]
    pub fn with_board_size(kind: PieceKind, team: Color, position: Coordinate, size: i16) -> Self {
        let variant = match kind {
            PieceKind::Pawn => {
                let direction = team.pawn_direction();
                let promotion_row = if direction < 0 { 0 } else { size - 1 };
                PieceVariant::Pawn {
                    direction,
                    promotion_row,
                }
            }
            PieceKind::Knight => PieceVariant::Knight,
            PieceKind::Bishop => PieceVariant::Bishop,
            PieceKind::Rook => PieceVariant::Rook,
            PieceKind::Queen => PieceVariant::Queen {
                depth_budget: QUEEN_DEPTH_BUDGET,
            },
            PieceKind::King => PieceVariant::King,
        };
        Piece {
            variant,
            team,
            position,
            position_history: Vec::new(),
            captured: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn variant(&self) -> &PieceVariant {
        &self.variant
    }

    /// The kind the piece was created as.
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        match self.variant {
            PieceVariant::Pawn { .. } => PieceKind::Pawn,
            PieceVariant::Knight => PieceKind::Knight,
            PieceVariant::Bishop => PieceKind::Bishop,
            PieceVariant::Rook => PieceKind::Rook,
            PieceVariant::Queen { .. } => PieceKind::Queen,
            PieceVariant::King => PieceKind::King,
        }
    }

    /// The kind the piece currently plays as: a promoted pawn is a queen.
    #[must_use]
    pub fn representation(&self) -> PieceKind {
        if self.is_promoted() {
            PieceKind::Queen
        } else {
            self.kind()
        }
    }

    #[inline]
    #[must_use]
    pub fn occupant(&self) -> Occupant {
        Occupant::new(self.representation(), self.team)
    }

    #[inline]
    #[must_use]
    pub const fn team(&self) -> Color {
        self.team
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn position_history(&self) -> &[Coordinate] {
        &self.position_history
    }

    #[inline]
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    #[inline]
    #[must_use]
    pub fn has_moved(&self) -> bool {
        !self.position_history.is_empty()
    }

    /// A pawn is promoted while its current square or any square in its
    /// history lies on its promotion row. Derived on every call so that
    /// truncating the history on undo demotes it again.
    #[must_use]
    pub fn is_promoted(&self) -> bool {
        match self.variant {
            PieceVariant::Pawn { promotion_row, .. } => {
                self.position.y == promotion_row
                    || self.position_history.iter().any(|c| c.y == promotion_row)
            }
            _ => false,
        }
    }

    /// The active move rules.
    #[must_use]
    pub fn move_rules(&self) -> &'static [MoveRule] {
        match self.variant {
            PieceVariant::Pawn { .. } if self.is_promoted() => QUEEN_RULES,
            PieceVariant::Pawn { direction, .. } if direction < 0 => PAWN_UP_RULES,
            PieceVariant::Pawn { .. } => PAWN_DOWN_RULES,
            PieceVariant::Knight => KNIGHT_RULES,
            PieceVariant::Bishop => BISHOP_RULES,
            PieceVariant::Rook => ROOK_RULES,
            PieceVariant::Queen { .. } => QUEEN_RULES,
            PieceVariant::King => KING_RULES,
        }
    }

    /// Pseudo-legal moves: the union of the active rules, deduplicated by
    /// destination.
    #[must_use]
    pub fn compute_valid_moves<B: BoardView + ?Sized>(&self, board: &B) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::new();
        for rule in self.move_rules() {
            for mv in rule.compute(board, self) {
                if !moves.contains(&mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// True if one of this piece's moves lands on `target`. The team of the
    /// occupant of `target` is not checked beyond what move generation does.
    #[must_use]
    pub fn can_capture_at<B: BoardView + ?Sized>(&self, board: &B, target: Coordinate) -> bool {
        if !self.could_reach(target) {
            return false;
        }
        self.move_rules()
            .iter()
            .any(|rule| rule.compute(board, self).iter().any(|m| m.destination == target))
    }

    /// True if this piece attacks `target`. An unpromoted pawn attacks the
    /// two squares diagonally ahead of it whether or not they are occupied,
    /// and never the squares it pushes to; every other piece attacks where it
    /// could capture.
    #[must_use]
    pub fn attacks<B: BoardView + ?Sized>(&self, board: &B, target: Coordinate) -> bool {
        match self.variant {
            PieceVariant::Pawn { direction, .. } if !self.is_promoted() => {
                let from = self.position;
                target == from.offset(1, direction) || target == from.offset(-1, direction)
            }
            _ => self.can_capture_at(board, target),
        }
    }

    /// Cheap geometric pre-filter for `can_capture_at`.
    fn could_reach(&self, target: Coordinate) -> bool {
        let from = self.position;
        if from == target {
            return false;
        }
        let dx = (target.x - from.x).abs();
        let dy = (target.y - from.y).abs();
        match self.representation() {
            PieceKind::Pawn => dx <= 1 && dy <= 2,
            PieceKind::Knight => (dx == 1 && dy == 2) || (dx == 2 && dy == 1),
            PieceKind::Bishop => from.is_diagonal_to(target),
            PieceKind::Rook => from.is_straight_to(target),
            PieceKind::Queen => from.is_diagonal_to(target) || from.is_straight_to(target),
            PieceKind::King => dx <= 1 && dy <= 1,
        }
    }

    /// Search depth to hand to the child of a move by this piece. Queens add
    /// [`QUEEN_DEPTH_EXTENSION`] plies until their budget is spent; the budget
    /// is consumed for good.
    pub fn extend_search_depth(&mut self, depth: u32) -> u32 {
        match &mut self.variant {
            PieceVariant::Queen { depth_budget } if *depth_budget > 0 => {
                *depth_budget -= 1;
                depth + QUEEN_DEPTH_EXTENSION
            }
            _ => depth,
        }
    }

    /// Extensions a queen has left; `None` for every other piece.
    #[must_use]
    pub fn depth_budget(&self) -> Option<u8> {
        match self.variant {
            PieceVariant::Queen { depth_budget } => Some(depth_budget),
            _ => None,
        }
    }

    /// Take `spent` extensions off a queen's budget, stopping at zero.
    pub(crate) fn spend_depth_budget(&mut self, spent: u8) {
        if let PieceVariant::Queen { depth_budget } = &mut self.variant {
            *depth_budget = depth_budget.saturating_sub(spent);
        }
    }

    pub(crate) fn move_to(&mut self, destination: Coordinate) {
        self.position = destination;
        self.position_history.push(destination);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.representation() {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{} {}({})", self.team, name, self.position)
    }
}
