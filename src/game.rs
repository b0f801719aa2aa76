//! Turn-by-turn game orchestration.
//!
//! A [`Game`] owns the position and the engine, plays engine moves for one
//! side and validated moves for the other, and detects the end of the game.
//! Everything worth telling a user is logged through the `log` facade and
//! also buffered, so a front end can drain it with
//! [`Game::consume_messages`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{
    fen, Board, BoardView, Color, Coordinate, FenError, MoveError, PieceId, PieceKind, Position,
    SquareMap, Squares,
};
use crate::evaluation::Strategy;
use crate::search::Minimax;
use crate::team::{PieceValues, Team};
use crate::zobrist::HashTable;

/// Engine settings for a game.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameParams {
    /// Search depth in plies.
    pub depth: u32,
    /// The engine resigns below this rating.
    pub resign_threshold: f64,
    /// Above this rating the engine switches to [`Strategy::MatingNet`].
    pub mating_threshold: f64,
}

impl Default for GameParams {
    fn default() -> Self {
        GameParams {
            depth: 2,
            resign_threshold: -50.0,
            mating_threshold: 10.0,
        }
    }
}

/// Plies after which pieces are ordered by middlegame values.
const MIDGAME_TURN: u32 = 15;
/// Plies after which pieces are ordered by endgame values.
const ENDGAME_TURN: u32 = 30;

/// A move that was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub piece: PieceId,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<PieceId>,
}

/// A game between a player and the engine.
pub struct Game<S: Squares = SquareMap> {
    position: Position<S>,
    minimax: Minimax<S>,
    player: Color,
    side_to_move: Color,
    turn: u32,
    rating: f64,
    winner: Option<Color>,
    draw: bool,
    messages: Vec<String>,
}

impl Game<SquareMap> {
    /// Game from a FEN string with the default engine.
    pub fn from_fen(fen: &str, player: Color) -> Result<Self, FenError> {
        Game::from_fen_as(fen, player)
    }
}

impl<S: Squares> Game<S> {
    pub fn new(position: Position<S>, side_to_move: Color, player: Color, minimax: Minimax<S>) -> Self {
        Game {
            position,
            minimax,
            player,
            side_to_move,
            turn: 0,
            rating: 0.0,
            winner: None,
            draw: false,
            messages: Vec::new(),
        }
    }

    /// Game with a move-count engine and a hash table built from the
    /// position's pieces.
    pub fn with_default_engine(position: Position<S>, side_to_move: Color, player: Color) -> Self {
        let table = HashTable::for_board(&position.board);
        let minimax = Minimax::new(Strategy::MoveCount, table);
        Game::new(position, side_to_move, player, minimax)
    }

    /// Game from a FEN string with the square storage `S`.
    pub fn from_fen_as(fen: &str, player: Color) -> Result<Self, FenError> {
        let (position, side) = fen::load_as::<S>(fen)?;
        Ok(Game::with_default_engine(position, side, player))
    }

    #[must_use]
    pub fn position(&self) -> &Position<S> {
        &self.position
    }

    #[must_use]
    pub fn board(&self) -> &Board<S> {
        &self.position.board
    }

    pub fn minimax_mut(&mut self) -> &mut Minimax<S> {
        &mut self.minimax
    }

    /// The side the player controls.
    #[must_use]
    pub fn player(&self) -> Color {
        self.player
    }

    /// The side the engine controls.
    #[must_use]
    pub fn engine(&self) -> Color {
        self.player.opponent()
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Plies played so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Rating of the engine's last search.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.draw
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.draw
    }

    /// Drain the buffered messages.
    pub fn consume_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// The position as FEN.
    #[must_use]
    pub fn fen(&self) -> String {
        fen::construct(&self.position.board, self.side_to_move)
    }

    fn message(&mut self, text: String) {
        #[cfg(feature = "logging")]
        log::info!("{text}");
        self.messages.push(text);
    }

    fn finish_ply(&mut self, mover: Color, played: &PlayedMove) {
        self.turn += 1;
        self.side_to_move = mover.opponent();
        let kind = self.position.board.piece(played.piece).representation();
        self.message(format!(
            "Turn {}: {mover} {kind:?} {} -> {}",
            self.turn, played.from, played.to
        ));
        if let Some(captured) = played.captured {
            let captured = self.position.board.piece(captured).to_string();
            self.message(format!("Captured {captured}"));
        }
    }

    /// Engine move for the engine side.
    ///
    /// Returns `None` when no move was played: the game was already over,
    /// the engine is checkmated or stalemated, the game is drawn, or the
    /// engine resigned.
    pub fn run_team(&mut self, params: &GameParams) -> Option<PlayedMove> {
        self.play_engine_move(self.engine(), params)
    }

    /// Engine move for whichever side is to move, for self-play.
    pub fn run_auto(&mut self, params: &GameParams) -> Option<PlayedMove> {
        self.play_engine_move(self.side_to_move, params)
    }

    fn order_pieces(&mut self) {
        let values = if self.turn > ENDGAME_TURN {
            PieceValues::LATE
        } else if self.turn > MIDGAME_TURN {
            PieceValues::MID
        } else {
            return;
        };
        let position = &mut self.position;
        position.white.sort_pieces(&position.board, &values);
        position.black.sort_pieces(&position.board, &values);
    }

    fn play_engine_move(&mut self, mover: Color, params: &GameParams) -> Option<PlayedMove> {
        if self.is_over() {
            return None;
        }
        self.order_pieces();

        let (board, team, enemy) = self.position.split_mut(mover);
        let in_check = team.in_check(board, enemy.pieces());
        let has_moves = !team.compute_valid_moves(board, enemy).is_empty();

        if !has_moves {
            if in_check {
                self.winner = Some(mover.opponent());
                self.message(format!("Checkmated team {mover}. Team {} wins.", mover.opponent()));
            } else {
                self.draw = true;
                self.message("Draw by stalemate.".to_string());
            }
            return None;
        }
        if board.is_draw_by_repetition(3, 2) {
            self.draw = true;
            self.message("Draw by repetition.".to_string());
            return None;
        }
        if board.is_draw_by_fifty_moves() {
            self.draw = true;
            self.message("Draw by 50 move rule.".to_string());
            return None;
        }
        if in_check {
            self.message(format!("{mover} is moving out of check."));
        }

        let (board, team, enemy) = self.position.split_mut(mover);
        let (rating, best) = self.minimax.run(board, team, enemy, params.depth, true);
        self.rating = rating;
        #[cfg(feature = "logging")]
        log::debug!(
            "{mover} searched {} nodes at depth {}, rating {rating}",
            self.minimax.nodes(),
            params.depth
        );

        let Some((piece, mv)) = best else {
            self.winner = Some(mover.opponent());
            self.message(format!("{mover} could not find a move."));
            return None;
        };
        if rating < params.resign_threshold {
            self.winner = Some(mover.opponent());
            self.message(format!("{mover} resigned the game."));
            return None;
        }
        if rating > params.mating_threshold {
            self.minimax.set_evaluator(Strategy::MatingNet);
        }

        let (board, _, enemy) = self.position.split_mut(mover);
        let from = board.piece(piece).position();
        let captured = board.move_piece_and_capture(mv.destination, piece, &mut enemy.pieces, true);
        let played = PlayedMove {
            piece,
            from,
            to: mv.destination,
            captured,
        };
        self.finish_ply(mover, &played);
        self.announce_check(mover);
        Some(played)
    }

    /// After `mover` played, report check or checkmate of the other side.
    fn announce_check(&mut self, mover: Color) {
        let defender = mover.opponent();
        let (board, team, enemy) = self.position.split_mut(defender);
        if !team.in_check(board, enemy.pieces()) {
            return;
        }
        if team.compute_valid_moves(board, enemy).is_empty() {
            self.winner = Some(mover);
            self.message(format!("Checkmated {defender}."));
        } else {
            self.message(format!("Checking {defender} king."));
        }
    }

    /// Play the player's move from `source` to `destination`, both in
    /// algebraic notation. Castling is requested by moving the king two
    /// squares towards a rook.
    pub fn run_player(&mut self, source: &str, destination: &str) -> Result<PieceId, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let from: Coordinate = source.parse()?;
        let to: Coordinate = destination.parse()?;
        let mover = self.player;
        let piece = self.player_piece_at(from)?;

        if self.is_castling_request(piece, from, to) {
            self.castle(piece, from, to)?;
            return Ok(piece);
        }

        let (board, team, enemy) = self.position.split_mut(mover);
        let reachable = board
            .piece(piece)
            .compute_valid_moves(&*board)
            .iter()
            .any(|mv| mv.destination == to);
        if !reachable {
            return Err(MoveError::Unreachable { from, to });
        }
        let legal = team
            .compute_valid_moves(board, enemy)
            .iter()
            .any(|&(id, mv)| id == piece && mv.destination == to);
        if !legal {
            return Err(MoveError::LeavesKingInCheck { from, to });
        }

        let captured = board.move_piece_and_capture(to, piece, &mut enemy.pieces, true);
        let played = PlayedMove {
            piece,
            from,
            to,
            captured,
        };
        self.finish_ply(mover, &played);
        self.announce_check(mover);
        Ok(piece)
    }

    fn player_piece_at(&self, square: Coordinate) -> Result<PieceId, MoveError> {
        let team = self.position.team(self.player);
        self.position
            .board
            .get(square)
            .filter(|id| team.pieces().contains(id))
            .ok_or(MoveError::NoPiece { square })
    }

    fn is_castling_request(&self, piece: PieceId, from: Coordinate, to: Coordinate) -> bool {
        let king = self.position.board.piece(piece);
        king.kind() == PieceKind::King && from.y == to.y && (to.x - from.x).abs() == 2
    }

    /// Castle with the rook on the side of `to`: king and rook unmoved, the
    /// squares between them empty, and the king neither in check nor passing
    /// through or landing on an attacked square.
    fn castle(&mut self, king: PieceId, from: Coordinate, to: Coordinate) -> Result<(), MoveError> {
        let mover = self.player;
        let illegal = MoveError::IllegalCastle { from, to };
        let step = (to.x - from.x).signum();
        let board = &self.position.board;
        let rook_square = Coordinate::new(if step > 0 { board.size() - 1 } else { 0 }, from.y);

        if board.piece(king).has_moved() {
            return Err(illegal);
        }
        let rook = board
            .get(rook_square)
            .filter(|&id| {
                let rook = board.piece(id);
                rook.kind() == PieceKind::Rook && rook.team() == mover && !rook.has_moved()
            })
            .ok_or_else(|| illegal.clone())?;

        let mut x = from.x + step;
        while x != rook_square.x {
            if !board.is_empty_at(Coordinate::new(x, from.y)) {
                return Err(illegal);
            }
            x += step;
        }

        let enemy = self.position.team(mover.opponent()).pieces();
        let middle = from.offset(step, 0);
        if [from, middle, to]
            .into_iter()
            .any(|square| Team::is_attacked(board, square, enemy))
        {
            return Err(illegal);
        }

        let board = &mut self.position.board;
        board.move_piece(king, to, false, true);
        board.move_piece(rook, middle, false, true);
        let played = PlayedMove {
            piece: king,
            from,
            to,
            captured: None,
        };
        self.finish_ply(mover, &played);
        let side = if step > 0 { "kingside" } else { "queenside" };
        self.message(format!("Castled {side}."));
        self.announce_check(mover);
        Ok(())
    }

    /// Pseudo-legal destinations of the piece on `square`, of either side.
    pub fn list_moves(&self, square: &str) -> Result<(PieceId, Vec<Coordinate>), MoveError> {
        let square: Coordinate = square.parse()?;
        let board = &self.position.board;
        let piece = board.get(square).ok_or(MoveError::NoPiece { square })?;
        let moves = board
            .piece(piece)
            .compute_valid_moves(board)
            .into_iter()
            .map(|mv| mv.destination)
            .collect();
        Ok((piece, moves))
    }

    /// The player's piece on `square`.
    pub fn show_piece(&self, square: &str) -> Result<PieceId, MoveError> {
        let square: Coordinate = square.parse()?;
        self.player_piece_at(square)
    }
}
