//! Depth-limited minimax with alpha-beta pruning.
//!
//! Features:
//! - Pluggable leaf evaluation, swappable between searches
//! - Queen depth extensions
//! - Leaf memoization keyed by position hash
//! - Root-split parallel search in [`smp`]
//!
//! The searching team is always the maximizing side of the evaluation;
//! `maximizing` only says whose turn it is at the root.

pub mod smp;

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, PieceId, ReversibleMove, SquareMap, Squares};
use crate::evaluation::Evaluator;
use crate::team::Team;
use crate::zobrist::{HashTable, PositionHash};

/// A chosen move: the piece and where it goes.
pub type PieceMove = (PieceId, Move);

/// How leaf evaluations are reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemoPolicy {
    /// Any stored leaf evaluation of the same position is reused in place of
    /// a subtree, whatever depth remains. Fast, approximate.
    #[default]
    ByHash,
    /// Only reuse a stored evaluation when the remaining depth matches, which
    /// only happens for leaves. Exact.
    ByHashAndDepth,
    /// No memo.
    Disabled,
}

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Alpha-beta cutoffs. Without them every child is searched with a full
    /// window, which is plain minimax.
    pub pruning: bool,
    /// Let pieces extend the depth below their moves.
    pub depth_extensions: bool,
    pub memo: MemoPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            pruning: true,
            depth_extensions: true,
            memo: MemoPolicy::ByHash,
        }
    }
}

/// Memo key. `depth` is zero unless the policy is [`MemoPolicy::ByHashAndDepth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub hash: PositionHash,
    pub depth: u32,
}

pub type Memo = HashMap<MemoKey, f64>;

/// Minimax searcher owning its evaluation, hash table and memo.
pub struct Minimax<S: Squares = SquareMap> {
    evaluator: Box<dyn Evaluator<S>>,
    table: HashTable,
    config: SearchConfig,
    memo: Memo,
    nodes: u64,
}

impl<S: Squares> Minimax<S> {
    pub fn new(evaluator: impl Evaluator<S> + 'static, table: HashTable) -> Self {
        Minimax::with_config(evaluator, table, SearchConfig::default())
    }

    pub fn with_config(
        evaluator: impl Evaluator<S> + 'static,
        table: HashTable,
        config: SearchConfig,
    ) -> Self {
        Minimax {
            evaluator: Box::new(evaluator),
            table,
            config,
            memo: Memo::new(),
            nodes: 0,
        }
    }

    /// Replace the evaluation used by later searches.
    pub fn set_evaluator(&mut self, evaluator: impl Evaluator<S> + 'static) {
        self.evaluator = Box::new(evaluator);
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    #[must_use]
    pub fn table(&self) -> &HashTable {
        &self.table
    }

    /// Nodes visited by the last search.
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Memo left behind by the last search.
    #[must_use]
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Search `depth` plies for `team` against `enemy` with a full window.
    ///
    /// Returns the rating and the best move found. The move is `None` when the
    /// position is drawn, when `depth` is zero, or when the side to move has no
    /// legal move. The memo is cleared first. Board and teams are restored
    /// before returning, apart from spent queen depth budgets.
    pub fn run(
        &mut self,
        board: &mut Board<S>,
        team: &mut Team,
        enemy: &mut Team,
        depth: u32,
        maximizing: bool,
    ) -> (f64, Option<PieceMove>) {
        self.run_with_window(
            board,
            team,
            enemy,
            depth,
            maximizing,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    /// [`Minimax::run`] with an explicit `(alpha, beta)` window.
    #[allow(clippy::too_many_arguments)]
    pub fn run_with_window(
        &mut self,
        board: &mut Board<S>,
        team: &mut Team,
        enemy: &mut Team,
        depth: u32,
        maximizing: bool,
        alpha: f64,
        beta: f64,
    ) -> (f64, Option<PieceMove>) {
        let mut searcher = Searcher::new(&*self.evaluator, &self.table, self.config);
        let result = searcher.search(board, team, enemy, depth, alpha, beta, maximizing);
        self.nodes = searcher.nodes;
        self.memo = searcher.memo;
        result
    }
}

/// One search's working state.
pub(crate) struct Searcher<'a, S: Squares> {
    evaluator: &'a dyn Evaluator<S>,
    table: &'a HashTable,
    config: SearchConfig,
    pub(crate) memo: Memo,
    pub(crate) nodes: u64,
}

impl<'a, S: Squares> Searcher<'a, S> {
    pub(crate) fn new(
        evaluator: &'a dyn Evaluator<S>,
        table: &'a HashTable,
        config: SearchConfig,
    ) -> Self {
        Searcher {
            evaluator,
            table,
            config,
            memo: Memo::new(),
            nodes: 0,
        }
    }

    /// Remaining depth below a move by `piece`.
    pub(crate) fn child_depth(&self, board: &mut Board<S>, piece: PieceId, depth: u32) -> u32 {
        let depth = depth - 1;
        if self.config.depth_extensions {
            board.piece_mut(piece).extend_search_depth(depth)
        } else {
            depth
        }
    }

    fn window(&self, alpha: f64, beta: f64) -> (f64, f64) {
        if self.config.pruning {
            (alpha, beta)
        } else {
            (f64::NEG_INFINITY, f64::INFINITY)
        }
    }

    fn key(&self, hash: PositionHash, depth: u32) -> MemoKey {
        match self.config.memo {
            MemoPolicy::ByHashAndDepth => MemoKey { hash, depth },
            _ => MemoKey { hash, depth: 0 },
        }
    }

    fn recall(&self, board: &Board<S>, depth: u32) -> Option<f64> {
        if self.config.memo == MemoPolicy::Disabled {
            return None;
        }
        let key = self.key(board.position_hash(self.table), depth);
        self.memo.get(&key).copied()
    }

    fn store(&mut self, board: &Board<S>, value: f64) {
        if self.config.memo == MemoPolicy::Disabled {
            return;
        }
        let key = self.key(board.position_hash(self.table), 0);
        self.memo.insert(key, value);
    }

    /// Value of a child position: the memo if it has one, else a search.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn evaluate_child(
        &mut self,
        board: &mut Board<S>,
        team: &mut Team,
        enemy: &mut Team,
        depth: u32,
        alpha: f64,
        beta: f64,
        maximizing: bool,
    ) -> f64 {
        if let Some(value) = self.recall(board, depth) {
            return value;
        }
        self.search(board, team, enemy, depth, alpha, beta, maximizing).0
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn search(
        &mut self,
        board: &mut Board<S>,
        team: &mut Team,
        enemy: &mut Team,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> (f64, Option<PieceMove>) {
        self.nodes += 1;

        if board.is_draw() {
            return (0.0, None);
        }

        if depth == 0 {
            let value = self.evaluator.evaluate(board, team, enemy);
            self.store(board, value);
            return (value, None);
        }

        if maximizing {
            let mut best = None;
            for (piece, mv) in team.compute_valid_moves(board, enemy) {
                let child_depth = self.child_depth(board, piece, depth);
                let (lo, hi) = self.window(alpha, beta);
                let value = {
                    let mut trial =
                        ReversibleMove::apply(&mut *board, &mut *enemy, piece, mv.destination);
                    let (board, enemy) = trial.parts_mut();
                    self.evaluate_child(board, team, enemy, child_depth, lo, hi, false)
                };
                if value > alpha {
                    best = Some((piece, mv));
                }
                alpha = alpha.max(value);
                if self.config.pruning && (value >= beta || beta <= alpha) {
                    break;
                }
            }
            return (alpha, best);
        }

        let mut best = None;
        for (piece, mv) in enemy.compute_valid_moves(board, team) {
            let child_depth = self.child_depth(board, piece, depth);
            let (lo, hi) = self.window(alpha, beta);
            let value = {
                let mut trial =
                    ReversibleMove::apply(&mut *board, &mut *team, piece, mv.destination);
                let (board, team) = trial.parts_mut();
                self.evaluate_child(board, team, enemy, child_depth, lo, hi, true)
            };
            if value < beta {
                best = Some((piece, mv));
            }
            beta = beta.min(value);
            if self.config.pruning && (value <= alpha || beta <= alpha) {
                break;
            }
        }
        (beta, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Color, Coordinate, PieceKind};
    use crate::evaluation::Strategy;

    fn sq(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn test_depth_zero_returns_evaluation() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let table = HashTable::for_board(&position.board);
        let mut minimax = Minimax::new(Strategy::MoveCount, table);
        let (rating, mv) = minimax.run(
            &mut position.board,
            &mut position.white,
            &mut position.black,
            0,
            true,
        );
        assert_eq!(rating, 0.0);
        assert!(mv.is_none());
        assert_eq!(minimax.memo().len(), 1);
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        // Black to move is checkmated: rook mate on the back rank.
        let mut position = BoardBuilder::new()
            .piece(sq("g6"), Color::White, PieceKind::King)
            .piece(sq("a8"), Color::White, PieceKind::Rook)
            .piece(sq("g8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let table = HashTable::for_board(&position.board);
        let mut minimax = Minimax::new(Strategy::MoveCount, table);
        let (rating, mv) = minimax.run(
            &mut position.board,
            &mut position.black,
            &mut position.white,
            2,
            true,
        );
        assert!(mv.is_none());
        assert_eq!(rating, f64::NEG_INFINITY);
    }

    #[test]
    fn test_search_restores_position() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let table = HashTable::for_board(&position.board);
        let before = position.board.position_hash(&table);
        let white_before = position.white.clone();
        let black_before = position.black.clone();
        let mut minimax = Minimax::with_config(
            Strategy::MoveCount,
            table.clone(),
            SearchConfig {
                depth_extensions: false,
                ..SearchConfig::default()
            },
        );
        let (_, mv) = minimax.run(
            &mut position.board,
            &mut position.white,
            &mut position.black,
            2,
            true,
        );
        assert!(mv.is_some());
        assert!(minimax.nodes() > 20);
        assert_eq!(position.board.position_hash(&table), before);
        assert!(position.board.move_history().is_empty());
        assert_eq!(position.white, white_before);
        assert_eq!(position.black, black_before);
    }

    #[test]
    fn test_drawn_position_returns_zero() {
        let mut position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("b1"), Color::White, PieceKind::Knight)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .piece(sq("g8"), Color::Black, PieceKind::Knight)
            .build()
            .unwrap();
        let wn = position.board.get(sq("b1")).unwrap();
        let bn = position.board.get(sq("g8")).unwrap();
        for _ in 0..3 {
            position.board.move_piece(wn, sq("c3"), false, true);
            position.board.move_piece(bn, sq("f6"), false, true);
            position.board.move_piece(wn, sq("b1"), false, true);
            position.board.move_piece(bn, sq("g8"), false, true);
        }
        assert!(position.board.is_draw());
        let table = HashTable::for_board(&position.board);
        let mut minimax = Minimax::new(Strategy::MoveCount, table);
        let result = minimax.run(
            &mut position.board,
            &mut position.white,
            &mut position.black,
            3,
            true,
        );
        assert_eq!(result, (0.0, None));
    }

    #[test]
    fn test_memo_policy_disabled_stores_nothing() {
        let mut position = BoardBuilder::starting_position().build().unwrap();
        let table = HashTable::for_board(&position.board);
        let mut minimax = Minimax::with_config(
            Strategy::MoveCount,
            table,
            SearchConfig {
                memo: MemoPolicy::Disabled,
                ..SearchConfig::default()
            },
        );
        minimax.run(
            &mut position.board,
            &mut position.white,
            &mut position.black,
            2,
            true,
        );
        assert!(minimax.memo().is_empty());
    }

    #[test]
    fn test_queen_extension_consumes_budget() {
        let mut position = BoardBuilder::new()
            .piece(sq("a1"), Color::White, PieceKind::King)
            .piece(sq("d1"), Color::White, PieceKind::Queen)
            .piece(sq("h8"), Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let queen = position.white.queen().unwrap();
        let table = HashTable::for_board(&position.board);
        let mut minimax = Minimax::new(Strategy::MoveCount, table);
        minimax.run(
            &mut position.board,
            &mut position.white,
            &mut position.black,
            1,
            true,
        );
        assert!(matches!(
            position.board.piece(queen).variant(),
            crate::board::PieceVariant::Queen { depth_budget: 0 }
        ));
    }
}
