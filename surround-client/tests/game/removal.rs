use std::collections::BTreeSet;

use serde_json::{Value, json};
use surround_engine::StoneColor;

use crate::common::game;

// . . b w .
// . . b w .
// . . b w b
// . . b w .
// . . b w .
fn endgame() -> Value {
    json!({
        "width": 5, "height": 5,
        "initial_state": {"black": "cacbcccdceec", "white": "dadbdcddde"},
        "score_territory": true, "score_stones": true, "komi": 0.5,
        "phase": "stone removal"
    })
}

#[tokio::test]
async fn removing_a_dead_stone_hands_over_its_area() {
    let mut game = game(endgame());
    let scores = game.compute_scores();
    assert_eq!(scores.black.territory, 10);
    assert_eq!(scores.white.territory, 0);

    let toggle = game.removal_toggle((2, 4)).unwrap();
    assert_eq!(toggle.remove, BTreeSet::from([(2, 4)]));
    game.apply_removal_toggle(&toggle);

    let scores = game.compute_scores();
    assert_eq!(scores.black.territory, 10);
    assert_eq!(scores.black.stones, 5);
    assert_eq!(scores.white.territory, 5);
    assert!(scores.white.scoring_positions.contains(&(2, 4)));
    assert_eq!(scores.black.total, 15.0);
    assert_eq!(scores.white.total, 10.5);
    assert_eq!(scores.winner(), Some(StoneColor::Black));
    assert!(game.position().game_scores().is_some());
}

#[tokio::test]
async fn removed_string_from_the_service() {
    let mut value = endgame();
    value["removed"] = json!("ec");
    let mut game = game(value);
    assert!(game.position().is_removed((2, 4)));
    assert_eq!(game.compute_scores().white.territory, 5);

    game.set_removed_stones("").unwrap();
    assert!(!game.position().is_removed((2, 4)));
    assert!(game.set_removed_stones("e").is_err());
}

#[tokio::test]
async fn toggle_off_the_board_is_an_error() {
    let game = game(endgame());
    assert!(game.removal_toggle((7, 7)).is_err());
}
