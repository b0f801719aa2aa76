//! Root-split parallel search.
//!
//! The legal root moves are dealt round-robin to scoped worker threads. Each
//! worker owns deep clones of the board and both teams and a private memo,
//! and searches its root moves with a full window. Worker memos are merged
//! into one table behind a `parking_lot::Mutex` as workers finish.
//!
//! Queen extensions for the root moves are taken from the caller's board
//! before the moves are handed out. Extensions spent below the root come out
//! of the workers' clones and are written back to the caller's queens once
//! every worker is done, so a parallel search uses up budget like a
//! sequential one.
//!
//! With no pruning at the root and full-window children, the result matches
//! the sequential search with pruning disabled at the root: the first root
//! move, in legal-move order, with the strictly highest value wins.

use std::thread;

use parking_lot::Mutex;

use super::{Memo, Minimax, PieceMove, Searcher};
use crate::board::{Board, PieceId, ReversibleMove, Squares};
use crate::team::Team;

/// Per-root-move result: index in the root move list and its value.
type Scored = (usize, f64);

/// Queen budgets per arena slot.
fn budgets<S: Squares>(board: &Board<S>) -> Vec<Option<u8>> {
    board.pieces().iter().map(|piece| piece.depth_budget()).collect()
}

impl<S: Squares> Minimax<S> {
    /// Search the position for the maximizing `team` on up to `workers`
    /// threads. The caller's pieces and teams are left where they were; only
    /// queen depth budgets are spent.
    pub fn run_parallel(
        &mut self,
        board: &mut Board<S>,
        team: &Team,
        enemy: &Team,
        depth: u32,
        workers: usize,
    ) -> (f64, Option<PieceMove>) {
        let mut root_team = team.clone();
        let mut root_enemy = enemy.clone();

        if depth == 0 || board.is_draw() {
            return self.run(board, &mut root_team, &mut root_enemy, depth, true);
        }

        let moves = root_team.compute_valid_moves(board, &mut root_enemy);
        let workers = workers.clamp(1, moves.len().max(1));

        let root = Searcher::new(&*self.evaluator, &self.table, self.config);
        let jobs: Vec<(usize, PieceMove, u32)> = moves
            .iter()
            .copied()
            .enumerate()
            .map(|(index, (piece, mv))| {
                (index, (piece, mv), root.child_depth(board, piece, depth))
            })
            .collect();

        let root_board = board.clone();
        let before = budgets(&root_board);

        let shared_memo: Mutex<Memo> = Mutex::new(Memo::new());
        let scores: Mutex<Vec<Scored>> = Mutex::new(Vec::with_capacity(moves.len()));
        let spent: Mutex<Vec<u32>> = Mutex::new(vec![0; before.len()]);
        let nodes: Mutex<u64> = Mutex::new(0);

        let evaluator = &*self.evaluator;
        let table = &self.table;
        let config = self.config;

        thread::scope(|scope| {
            for worker in 0..workers {
                let assigned: Vec<(usize, PieceMove, u32)> =
                    jobs.iter().copied().skip(worker).step_by(workers).collect();
                let (board, team, enemy) = (&root_board, &root_team, &root_enemy);
                let (shared_memo, scores, spent, nodes) = (&shared_memo, &scores, &spent, &nodes);
                let before = &before;

                let job = move || {
                    let mut board = board.clone();
                    let mut team = team.clone();
                    let mut enemy = enemy.clone();
                    let mut searcher = Searcher::new(evaluator, table, config);
                    let mut local = Vec::with_capacity(assigned.len());

                    for (index, (piece, mv), child_depth) in assigned {
                        let mut trial = ReversibleMove::apply(
                            &mut board,
                            &mut enemy,
                            piece,
                            mv.destination,
                        );
                        let (board, enemy) = trial.parts_mut();
                        let value = searcher.evaluate_child(
                            board,
                            &mut team,
                            enemy,
                            child_depth,
                            f64::NEG_INFINITY,
                            f64::INFINITY,
                            false,
                        );
                        local.push((index, value));
                    }

                    let after = budgets(&board);
                    {
                        let mut spent = spent.lock();
                        for (slot, (old, new)) in before.iter().zip(after).enumerate() {
                            if let (Some(old), Some(new)) = (old, new) {
                                spent[slot] += u32::from(old - new);
                            }
                        }
                    }
                    scores.lock().extend(local);
                    shared_memo.lock().extend(searcher.memo);
                    *nodes.lock() += searcher.nodes;
                };

                let spawned = thread::Builder::new()
                    .name(format!("minimax-{worker}"))
                    .spawn_scoped(scope, job.clone());
                if spawned.is_err() {
                    job();
                }
            }
        });

        for (slot, total) in spent.into_inner().into_iter().enumerate() {
            if total > 0 {
                let total = u8::try_from(total).unwrap_or(u8::MAX);
                board.piece_mut(PieceId(slot)).spend_depth_budget(total);
            }
        }

        self.memo = shared_memo.into_inner();
        self.nodes = nodes.into_inner() + 1;

        let mut scores = scores.into_inner();
        scores.sort_by_key(|&(index, _)| index);
        let mut best_value = f64::NEG_INFINITY;
        let mut best = None;
        for (index, value) in scores {
            if value > best_value {
                best_value = value;
                best = Some(moves[index]);
            }
        }
        (best_value, best)
    }
}
