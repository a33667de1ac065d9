use serde_json::json;
use surround_client::error::AppError;
use surround_client::services::game::Game;
use surround_engine::{PointState, StoneColor};

use crate::common::{game, record};

/// The first `handicap` moves are black placements, then the initial player moves.
#[tokio::test]
async fn handicap_moves_are_placements() {
    let game = game(json!({
        "width": 9, "height": 9, "handicap": 2, "initial_player": "white",
        "moves": [[2, 2], [6, 6], [4, 4]]
    }));
    let position = game.position();
    assert_eq!(position.point_state((2, 2)), PointState::Occupied(StoneColor::Black));
    assert_eq!(position.point_state((6, 6)), PointState::Occupied(StoneColor::Black));
    assert_eq!(position.point_state((4, 4)), PointState::Occupied(StoneColor::White));
    assert_eq!(position.next_to_move(), StoneColor::Black);
    assert_eq!(position.last_move_number(), 3);

    let second = game.tree().main_line_position(2).unwrap();
    assert_eq!(game.arena().get(second).next_to_move(), StoneColor::White);
    let first = game.tree().main_line_position(1).unwrap();
    assert_eq!(game.arena().get(first).next_to_move(), StoneColor::Black);
}

/// Setup stones already encode the handicap, so every move is played normally.
#[tokio::test]
async fn setup_stones_skip_handicap_placement() {
    let game = game(json!({
        "width": 9, "height": 9, "handicap": 2, "initial_player": "white",
        "initial_state": {"black": "ccgg", "white": ""},
        "moves": [[4, 4], [5, 5]]
    }));
    let position = game.position();
    assert_eq!(position.stone_count(StoneColor::Black), 3);
    assert_eq!(position.point_state((4, 4)), PointState::Occupied(StoneColor::White));
    assert_eq!(position.point_state((5, 5)), PointState::Occupied(StoneColor::Black));
}

#[tokio::test]
async fn short_move_list_skips_handicap_placement() {
    let game = game(json!({
        "width": 9, "height": 9, "handicap": 3, "moves": [[2, 2]]
    }));
    assert_eq!(game.position().next_to_move(), StoneColor::White);
    assert_eq!(game.position().last_move_number(), 1);
}

#[tokio::test]
async fn bad_setup_string_is_rejected() {
    let result = Game::from_record(record(json!({
        "width": 9, "height": 9, "initial_state": {"black": "abc", "white": ""}
    })));
    assert!(matches!(result, Err(AppError::Coordinate(_))));
}
