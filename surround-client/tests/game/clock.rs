use serde_json::{Value, json};
use surround_client::models::time_control::TimeControlSystem;
use surround_client::services::clock::Clock;
use surround_engine::StoneColor;

use crate::common::{LAST_MOVE_MS, after, game};

fn timed_game(pause_control: Value) -> Value {
    json!({
        "width": 9, "height": 9,
        "black_player_id": 1, "white_player_id": 2,
        "time_control": {
            "time_control": "byoyomi", "main_time": 10, "periods": 3, "period_time": 30,
            "speed": "live"
        },
        "clock": {
            "black_player_id": 1, "white_player_id": 2, "current_player": 1,
            "last_move": LAST_MOVE_MS,
            "black_time": {"thinking_time": 10, "periods": 3, "period_time": 30},
            "white_time": {"thinking_time": 10, "periods": 3, "period_time": 30},
            "paused_since": LAST_MOVE_MS + 5_000
        },
        "pause_control": pause_control
    })
}

/// Only the player to move loses time; overtime shows once main time is gone.
#[tokio::test]
async fn tick_runs_the_current_players_clock() {
    let mut game = game(timed_game(json!({})));
    assert!(matches!(game.time_control(), TimeControlSystem::ByoYomi { periods: 3, .. }));

    game.tick_clock(after(4));
    let clock = game.clock().unwrap();
    assert_eq!(clock.time(StoneColor::Black).time_left(), Some(6.0));

    game.tick_clock(after(25));
    let clock = game.clock().unwrap();
    let black = clock.time(StoneColor::Black);
    assert_eq!(black.thinking_time_left, Some(0.0));
    assert_eq!(black.periods_left, Some(3));
    assert_eq!(black.time_left(), Some(15.0));
    assert_eq!(clock.time(StoneColor::White).time_left(), Some(10.0));
}

/// A paused game stops counting at the pause timestamp.
#[tokio::test]
async fn paused_game_stops_the_clock() {
    let mut game = game(timed_game(json!({"system": true})));
    game.tick_clock(after(600));
    let black = game.clock().unwrap().time(StoneColor::Black);
    assert_eq!(black.time_left(), Some(5.0));

    game.update_pause_control(None);
    game.tick_clock(after(12));
    let black = game.clock().unwrap().time(StoneColor::Black);
    assert_eq!(black.thinking_time_left, Some(0.0));
    assert_eq!(black.time_left(), Some(28.0));
}

/// A fresh clock from the service replaces the old one and turns the tables.
#[tokio::test]
async fn clock_update_switches_sides() {
    let mut game = game(timed_game(json!({})));
    let clock: Clock = serde_json::from_value(json!({
        "black_player_id": 1, "white_player_id": 2, "current_player": 2,
        "last_move": LAST_MOVE_MS,
        "black_time": {"thinking_time": 7, "periods": 3, "period_time": 30},
        "white_time": {"thinking_time": 10, "periods": 3, "period_time": 30}
    }))
    .unwrap();
    game.update_clock(clock);
    game.set_server_time_offset(2_000);
    game.tick_clock(after(5));

    let clock = game.clock().unwrap();
    assert_eq!(clock.current_player, StoneColor::White);
    assert_eq!(clock.time(StoneColor::White).time_left(), Some(7.0));
    assert_eq!(clock.time(StoneColor::Black).time_left(), Some(7.0));
}

#[tokio::test]
async fn untimed_game_has_no_clock() {
    let mut game = game(json!({"width": 9, "height": 9}));
    game.tick_clock(after(30));
    assert!(game.clock().is_none());
    assert_eq!(game.time_control(), TimeControlSystem::None);
}
