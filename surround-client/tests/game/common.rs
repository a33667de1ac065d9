#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use surround_client::SharedGame;
use surround_client::models::record::GameRecord;
use surround_client::services::game::Game;
use tokio::sync::Mutex;

pub const LAST_MOVE_MS: i64 = 1_700_000_000_000;

pub fn record(value: Value) -> GameRecord {
    serde_json::from_value(value).unwrap()
}

pub fn game(value: Value) -> Game {
    Game::from_record(record(value)).unwrap()
}

pub fn shared(value: Value) -> SharedGame {
    Arc::new(Mutex::new(game(value)))
}

/// `seconds` after the last move of the clock fixtures.
pub fn after(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(LAST_MOVE_MS).unwrap() + TimeDelta::seconds(seconds)
}
