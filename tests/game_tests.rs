//! Game orchestration tests: player moves, castling, engine replies and the
//! end of the game.

use minimax_chess::board::{fen, BoardView, Color, MoveError, PieceKind};
use minimax_chess::game::{Game, GameParams};
use minimax_chess::Coordinate;

fn sq(s: &str) -> Coordinate {
    s.parse().unwrap()
}

fn kind_at(game: &Game, square: &str) -> Option<(PieceKind, Color)> {
    game.board()
        .occupant(sq(square))
        .map(|occupant| (occupant.kind, occupant.team))
}

#[test]
fn game_params_defaults() {
    let params = GameParams::default();
    assert_eq!(params.depth, 2);
    assert_eq!(params.resign_threshold, -50.0);
    assert_eq!(params.mating_threshold, 10.0);
}

#[test]
fn player_move_then_engine_reply() {
    let mut game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    assert_eq!(game.side_to_move(), Color::White);

    game.run_player("e2", "e4").unwrap();
    assert_eq!(game.turn(), 1);
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(kind_at(&game, "e4"), Some((PieceKind::Pawn, Color::White)));

    let played = game.run_team(&GameParams::default()).expect("engine should move");
    assert_eq!(game.board().piece(played.piece).team(), Color::Black);
    assert_eq!(game.turn(), 2);
    assert_eq!(game.side_to_move(), Color::White);
    assert!(!game.is_over());

    let messages = game.consume_messages();
    assert!(messages.iter().any(|m| m.starts_with("Turn 1: White Pawn e2 -> e4")));
    assert!(messages.iter().any(|m| m.starts_with("Turn 2: Black")));
    assert!(game.consume_messages().is_empty());
}

#[test]
fn self_play_alternates_sides() {
    let mut game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    let params = GameParams {
        depth: 1,
        ..GameParams::default()
    };
    for ply in 0..4 {
        let mover = game.side_to_move();
        let played = game.run_auto(&params).expect("a move");
        assert_eq!(game.board().piece(played.piece).team(), mover, "ply {ply}");
        assert_eq!(game.side_to_move(), mover.opponent());
    }
    assert_eq!(game.turn(), 4);
    assert_eq!(game.board().move_history().len(), 4);
}

#[test]
fn rejects_bad_requests() {
    let mut game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    assert!(matches!(
        game.run_player("z9", "e4"),
        Err(MoveError::InvalidSquare(_))
    ));
    assert_eq!(
        game.run_player("e4", "e5"),
        Err(MoveError::NoPiece { square: sq("e4") })
    );
    assert_eq!(
        game.run_player("e7", "e5"),
        Err(MoveError::NoPiece { square: sq("e7") })
    );
    assert_eq!(
        game.run_player("e2", "e5"),
        Err(MoveError::Unreachable {
            from: sq("e2"),
            to: sq("e5")
        })
    );
    assert_eq!(game.turn(), 0);
    assert!(game.board().move_history().is_empty());
}

#[test]
fn rejects_move_of_pinned_piece() {
    let mut game = Game::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1", Color::White).unwrap();
    assert_eq!(
        game.run_player("e2", "c3"),
        Err(MoveError::LeavesKingInCheck {
            from: sq("e2"),
            to: sq("c3")
        })
    );
}

#[test]
fn castles_kingside() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).unwrap();
    game.run_player("e1", "g1").unwrap();
    assert_eq!(kind_at(&game, "g1"), Some((PieceKind::King, Color::White)));
    assert_eq!(kind_at(&game, "f1"), Some((PieceKind::Rook, Color::White)));
    assert!(game.board().is_empty_at(sq("e1")));
    assert!(game.board().is_empty_at(sq("h1")));
    assert_eq!(game.turn(), 1);
    assert_eq!(game.side_to_move(), Color::Black);
    assert!(game
        .consume_messages()
        .contains(&"Castled kingside.".to_string()));
}

#[test]
fn castles_queenside() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).unwrap();
    game.run_player("e1", "c1").unwrap();
    assert_eq!(kind_at(&game, "c1"), Some((PieceKind::King, Color::White)));
    assert_eq!(kind_at(&game, "d1"), Some((PieceKind::Rook, Color::White)));
    assert!(game.board().is_empty_at(sq("a1")));
}

#[test]
fn black_player_castles() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b - - 0 1", Color::Black).unwrap();
    game.run_player("e8", "g8").unwrap();
    assert_eq!(kind_at(&game, "g8"), Some((PieceKind::King, Color::Black)));
    assert_eq!(kind_at(&game, "f8"), Some((PieceKind::Rook, Color::Black)));
}

#[test]
fn cannot_castle_through_attacked_square() {
    let mut game = Game::from_fen("4kr2/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).unwrap();
    let illegal = MoveError::IllegalCastle {
        from: sq("e1"),
        to: sq("g1"),
    };
    assert_eq!(game.run_player("e1", "g1"), Err(illegal));
    game.run_player("e1", "c1").unwrap();
}

#[test]
fn cannot_castle_into_pawn_attack() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/7p/R3K2R w - - 0 1", Color::White).unwrap();
    assert_eq!(
        game.run_player("e1", "g1"),
        Err(MoveError::IllegalCastle {
            from: sq("e1"),
            to: sq("g1"),
        })
    );
    assert_eq!(kind_at(&game, "e1"), Some((PieceKind::King, Color::White)));
    game.run_player("e1", "c1").unwrap();
    assert_eq!(kind_at(&game, "c1"), Some((PieceKind::King, Color::White)));
}

#[test]
fn cannot_castle_out_of_check() {
    let mut game = Game::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).unwrap();
    assert!(matches!(
        game.run_player("e1", "g1"),
        Err(MoveError::IllegalCastle { .. })
    ));
    assert!(matches!(
        game.run_player("e1", "c1"),
        Err(MoveError::IllegalCastle { .. })
    ));
}

#[test]
fn cannot_castle_through_pieces() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/RN2K2R w - - 0 1", Color::White).unwrap();
    assert!(matches!(
        game.run_player("e1", "c1"),
        Err(MoveError::IllegalCastle { .. })
    ));
    game.run_player("e1", "g1").unwrap();
}

#[test]
fn cannot_castle_after_king_moved() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).unwrap();
    game.run_player("e1", "e2").unwrap();
    game.run_player("e2", "e1").unwrap();
    assert!(matches!(
        game.run_player("e1", "g1"),
        Err(MoveError::IllegalCastle { .. })
    ));
}

#[test]
fn player_delivers_checkmate() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1", Color::White).unwrap();
    game.run_player("d1", "d8").unwrap();
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(Color::White));
    assert!(game
        .consume_messages()
        .contains(&"Checkmated Black.".to_string()));

    assert_eq!(game.run_player("g1", "h1"), Err(MoveError::GameOver));
    assert!(game.run_team(&GameParams::default()).is_none());
}

#[test]
fn engine_checkmated() {
    let mut game = Game::from_fen("R6k/8/6K1/8/8/8/8/8 b - - 0 1", Color::White).unwrap();
    assert!(game.run_team(&GameParams::default()).is_none());
    assert_eq!(game.winner(), Some(Color::White));
    assert!(game
        .consume_messages()
        .contains(&"Checkmated team Black. Team White wins.".to_string()));
}

#[test]
fn engine_stalemated() {
    let mut game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", Color::White).unwrap();
    assert!(game.run_team(&GameParams::default()).is_none());
    assert!(game.is_draw());
    assert_eq!(game.winner(), None);
    assert!(game
        .consume_messages()
        .contains(&"Draw by stalemate.".to_string()));
}

#[test]
fn engine_mates_in_one() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1", Color::Black).unwrap();
    let played = game.run_team(&GameParams::default()).expect("a move");
    assert_eq!(played.to, sq("d8"));
    assert_eq!(game.rating(), f64::INFINITY);
    assert_eq!(game.winner(), Some(Color::White));
}

#[test]
fn engine_resigns_below_threshold() {
    let mut game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    game.run_player("e2", "e4").unwrap();
    let params = GameParams {
        resign_threshold: 1000.0,
        ..GameParams::default()
    };
    assert!(game.run_team(&params).is_none());
    assert_eq!(game.winner(), Some(Color::White));
    assert!(game
        .consume_messages()
        .iter()
        .any(|m| m.contains("resigned")));
}

#[test]
fn engine_captures_announced() {
    let mut game = Game::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", Color::Black).unwrap();
    let played = game.run_team(&GameParams::default()).expect("a move");
    assert!(played.captured.is_some());
    let messages = game.consume_messages();
    assert!(messages.iter().any(|m| m.starts_with("Captured Black Queen")));
}

#[test]
fn list_moves_and_show_piece() {
    let game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    let (knight, mut moves) = game.list_moves("b1").unwrap();
    assert_eq!(game.board().piece(knight).kind(), PieceKind::Knight);
    moves.sort_by_key(|c| c.x);
    assert_eq!(moves, vec![sq("a3"), sq("c3")]);

    let (_, black_moves) = game.list_moves("g8").unwrap();
    assert_eq!(black_moves.len(), 2);

    assert_eq!(game.show_piece("d1").map(|id| game.board().piece(id).kind()), Ok(PieceKind::Queen));
    assert_eq!(
        game.show_piece("d8"),
        Err(MoveError::NoPiece { square: sq("d8") })
    );
    assert!(matches!(game.list_moves("e4"), Err(MoveError::NoPiece { .. })));
}

#[test]
fn fen_tracks_side_to_move() {
    let mut game = Game::from_fen(fen::STARTING_FEN, Color::White).unwrap();
    game.run_player("g1", "f3").unwrap();
    assert_eq!(
        game.fen(),
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b - - 1 1"
    );
}

#[cfg(feature = "serde")]
#[test]
fn params_load_from_json() {
    use minimax_chess::search::{MemoPolicy, SearchConfig};

    let params: GameParams =
        serde_json::from_str(r#"{"depth":3,"resign_threshold":-80.0,"mating_threshold":12.5}"#)
            .unwrap();
    assert_eq!(params.depth, 3);
    assert_eq!(params.mating_threshold, 12.5);

    let config: SearchConfig =
        serde_json::from_str(r#"{"pruning":false,"depth_extensions":true,"memo":"Disabled"}"#)
            .unwrap();
    assert_eq!(config.memo, MemoPolicy::Disabled);
    assert!(!config.pruning);
}
