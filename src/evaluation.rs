//! Leaf evaluation.
//!
//! Every evaluation rates a position from the point of view of `team`: higher
//! is better for `team`. Evaluations are swappable mid-game through
//! [`Minimax::set_evaluator`](crate::search::Minimax::set_evaluator).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Coordinate, SquareMap, Squares};
use crate::team::Team;

/// A leaf evaluation function.
pub trait Evaluator<S: Squares = SquareMap>: Send + Sync {
    /// Rate the position for `team`. The board and `enemy` may be used for
    /// trial moves but must be left as they were found.
    fn evaluate(&self, board: &mut Board<S>, team: &Team, enemy: &mut Team) -> f64;
}

impl<S, F> Evaluator<S> for F
where
    S: Squares,
    F: Fn(&mut Board<S>, &Team, &mut Team) -> f64 + Send + Sync,
{
    fn evaluate(&self, board: &mut Board<S>, team: &Team, enemy: &mut Team) -> f64 {
        self(board, team, enemy)
    }
}

/// Built-in evaluations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Own pseudo-legal move count minus the enemy's.
    #[default]
    MoveCount,
    /// Move counts with captures weighted up, as a ratio.
    MoveCountWithCaptures,
    /// Closeness of every move to the enemy king, minus the same for the
    /// enemy.
    KingDistance,
    /// Own legal move count minus the enemy king's mobility.
    MatingNet,
}

impl<S: Squares> Evaluator<S> for Strategy {
    fn evaluate(&self, board: &mut Board<S>, team: &Team, enemy: &mut Team) -> f64 {
        match self {
            Strategy::MoveCount => move_count(board, team, enemy),
            Strategy::MoveCountWithCaptures => move_count_with_captures(board, team, enemy),
            Strategy::KingDistance => king_distance(board, team, enemy),
            Strategy::MatingNet => mating_net(board, team, enemy),
        }
    }
}

/// Pseudo-legal moves are used instead of legal ones to keep leaves cheap.
pub fn move_count<S: Squares>(board: &Board<S>, team: &Team, enemy: &Team) -> f64 {
    team.compute_all_moves(board).len() as f64 - enemy.compute_all_moves(board).len() as f64
}

/// `(ally - 1) / enemy`, where own captures count twice and enemy captures
/// three times. Infinite when the enemy has no moves.
pub fn move_count_with_captures<S: Squares>(board: &Board<S>, team: &Team, enemy: &Team) -> f64 {
    let ally: u32 = team
        .compute_all_moves(board)
        .iter()
        .map(|(_, mv)| if mv.can_capture { 2 } else { 1 })
        .sum();
    let opponent: u32 = enemy
        .compute_all_moves(board)
        .iter()
        .map(|(_, mv)| if mv.can_capture { 3 } else { 1 })
        .sum();
    if opponent == 0 {
        return f64::INFINITY;
    }
    (f64::from(ally) - 1.0) / f64::from(opponent)
}

fn inverse_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d = a.distance(b);
    if d == 0.0 {
        1.0
    } else {
        1.0 / d
    }
}

pub fn king_distance<S: Squares>(board: &Board<S>, team: &Team, enemy: &Team) -> f64 {
    let enemy_king = board.piece(enemy.king()).position();
    let own_king = board.piece(team.king()).position();
    let ally: f64 = team
        .compute_all_moves(board)
        .iter()
        .map(|(_, mv)| inverse_distance(enemy_king, mv.destination))
        .sum();
    let opponent: f64 = enemy
        .compute_all_moves(board)
        .iter()
        .map(|(_, mv)| inverse_distance(own_king, mv.destination))
        .sum();
    ally - opponent
}

/// Keeps own mobility high while boxing in the enemy king.
pub fn mating_net<S: Squares>(board: &mut Board<S>, team: &Team, enemy: &mut Team) -> f64 {
    let own = team.compute_valid_moves(board, enemy).len();
    let king = board.piece(enemy.king());
    let cornered = king.compute_valid_moves(&*board).len();
    own as f64 - cornered as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Color, PieceKind};

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn test_move_count_is_symmetric_at_start() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let score = Strategy::MoveCount.evaluate(
            &mut position.board,
            &position.white,
            &mut position.black,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_move_count_with_captures_weights() {
        // White rook attacks the black knight; black king and knight have no
        // captures.
        let position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("d1"), Color::White, PieceKind::Rook)
            .piece(sq("d5"), Color::Black, PieceKind::Knight)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let white_moves = position.white.compute_all_moves(&position.board);
        let captures = white_moves.iter().filter(|(_, m)| m.can_capture).count();
        assert_eq!(captures, 1);
        let ally = (white_moves.len() + captures) as f64;
        let enemy = position.black.compute_all_moves(&position.board).len() as f64;
        let score = move_count_with_captures(&position.board, &position.white, &position.black);
        assert!((score - (ally - 1.0) / enemy).abs() < 1e-12);
    }

    #[test]
    fn test_move_count_with_captures_infinite_without_enemy_moves() {
        let mut position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        position.black.pieces.clear();
        let score = move_count_with_captures(&position.board, &position.white, &position.black);
        assert!(score.is_infinite() && score > 0.0);
    }

    #[test]
    fn test_king_distance_prefers_approach() {
        let near = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("e6"), Color::White, PieceKind::Knight)
            .piece(sq("e8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let far = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("e3"), Color::White, PieceKind::Knight)
            .piece(sq("e8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let near_score = king_distance(&near.board, &near.white, &near.black);
        let far_score = king_distance(&far.board, &far.white, &far.black);
        assert!(near_score > far_score);
    }

    #[test]
    fn test_mating_net_counts_king_mobility() {
        let mut position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("b7"), Color::White, PieceKind::Rook)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let own = position
            .white
            .compute_valid_moves(&mut position.board, &mut position.black)
            .len() as f64;
        // h8 king: g8, g7, h7 are pseudo-legal even though two are covered.
        let score = Strategy::MatingNet.evaluate(
            &mut position.board,
            &position.white,
            &mut position.black,
        );
        assert_eq!(score, own - 3.0);
    }

    #[test]
    fn test_closure_evaluator() {
        let constant = |_: &mut Board, _: &Team, _: &mut Team| 42.0;
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let score = constant.evaluate(&mut position.board, &position.white, &mut position.black);
        assert_eq!(score, 42.0);
    }
}
