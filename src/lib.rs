//! Chess move generation and a minimax engine.
//!
//! - [`board`] - piece arena, square storage, move rules, FEN, reversible moves
//! - [`team`] - one side's pieces, legal moves and check detection
//! - [`zobrist`] - position hashing for the search memo
//! - [`evaluation`] - leaf evaluations
//! - [`search`] - minimax with alpha-beta pruning, sequential and parallel
//! - [`game`] - turn-by-turn play between a player and the engine

pub mod board;
pub mod evaluation;
pub mod game;
pub mod search;
pub mod team;
pub mod zobrist;

pub use board::{BitBoard, Board, BoardBuilder, Color, Coordinate, Move, Piece, PieceId, PieceKind};
pub use evaluation::{Evaluator, Strategy};
pub use game::{Game, GameParams, PlayedMove};
pub use search::{MemoPolicy, Minimax, SearchConfig};
pub use team::Team;
