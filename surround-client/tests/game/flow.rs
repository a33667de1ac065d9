use serde_json::json;
use surround_client::error::AppError;
use surround_engine::{Move, MoveError, StoneColor};

use crate::common::game;

/// Analysis from an earlier main-line position becomes a variation and leaves
/// the current position alone.
#[tokio::test]
async fn analysis_branches_off_the_main_line() {
    let mut game = game(json!({"width": 5, "height": 5, "moves": [[0, 0], [1, 1]]}));
    let current = game.current();
    let first = game.tree().main_line_position(1).unwrap();

    let branch = game.analyze(first, Move::PlaceStone(2, 2)).unwrap();
    assert_eq!(game.current(), current);
    assert_eq!(game.tree().index(branch), Some(1));
    assert_eq!(game.tree().positions_at(2).len(), 2);

    let variation = game.variation_to(branch).unwrap();
    assert_eq!(variation.base, first);
    assert_eq!(variation.moves, vec![Move::PlaceStone(2, 2)]);
    assert!(game.variation_to(current).is_none());
}

/// Undo removes the current move and anything explored after it.
#[tokio::test]
async fn undo_prunes_the_subtree() {
    let mut game = game(json!({
        "width": 5, "height": 5, "moves": [[0, 0], [1, 1], [2, 2]]
    }));
    let third = game.current();
    let explored = game.analyze(third, Move::PlaceStone(4, 4)).unwrap();

    let back = game.undo().unwrap();
    assert_eq!(back, game.tree().main_line_position(2).unwrap());
    assert!(!game.tree().contains(third));
    assert!(!game.tree().contains(explored));
    assert_eq!(game.tree().largest_move_number(), 2);
    assert_eq!(game.position().next_to_move(), StoneColor::Black);

    game.play(Move::PlaceStone(3, 3)).unwrap();
    assert_eq!(game.tree().largest_move_number(), 3);
}

#[tokio::test]
async fn undo_stops_at_the_root() {
    let mut game = game(json!({"width": 5, "height": 5, "moves": [[0, 0]]}));
    assert!(game.undo().is_some());
    assert!(game.undo().is_none());
    assert_eq!(game.current(), game.tree().root());
}

/// White may not retake the ko at once, but may after an exchange elsewhere.
#[tokio::test]
async fn ko_is_enforced_through_the_game() {
    // After the record black has just captured at (1, 2):
    // . b w . .
    // b . b w .
    // . b w . .
    let mut game = game(json!({
        "width": 5, "height": 5,
        "moves": [[1, 0], [2, 0], [0, 1], [2, 2], [1, 2], [3, 1], [4, 4], [1, 1], [2, 1]]
    }));
    assert!(game.position().point_state((1, 1)).is_empty());

    let before = game.current();
    assert!(matches!(
        game.play(Move::PlaceStone(1, 1)),
        Err(AppError::Move(MoveError::IllegalKoMove))
    ));
    assert_eq!(game.current(), before);

    game.play(Move::PlaceStone(4, 0)).unwrap();
    game.play(Move::PlaceStone(3, 3)).unwrap();
    game.play(Move::PlaceStone(1, 1)).unwrap();
    assert!(game.position().point_state((1, 2)).is_empty());
}

#[tokio::test]
async fn passes_advance_the_move_number() {
    let mut game = game(json!({"width": 9, "height": 9, "moves": [[4, 4], [-1, -1]]}));
    assert_eq!(game.position().last_move(), Some(Move::Pass));
    game.play(Move::Pass).unwrap();
    assert_eq!(game.position().last_move_number(), 3);
    assert_eq!(game.position().next_to_move(), StoneColor::White);
}
