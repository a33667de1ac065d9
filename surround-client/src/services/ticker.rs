use std::time::Duration;

use chrono::Utc;

use crate::SharedGame;

/// Recompute the clock of `game` every `period` until the game finishes.
pub async fn run(game: SharedGame, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let mut game = game.lock().await;
        if game.is_finished() {
            tracing::info!("Game {} finished, clock ticker stopping", game.record().game_id);
            return;
        }
        game.tick_clock(Utc::now());
    }
}
