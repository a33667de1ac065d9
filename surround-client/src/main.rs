use std::sync::Arc;

use chrono::Utc;
use surround_client::config::Config;
use surround_client::error::AppError;
use surround_client::models::record::GameRecord;
use surround_client::services::estimation::{self, PlayoutEstimator};
use surround_client::services::game::Game;
use surround_engine::{PointState, StoneColor};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surround_client=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| AppError::Config("usage: surround <record.json> [--estimate]".to_string()))?;
    let estimate = args.any(|a| a == "--estimate");
    let config = Config::from_env()?;

    let record: GameRecord = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let mut game = Game::from_record(record)?;
    game.set_server_time_offset(config.server_time_offset_ms);
    game.tick_clock(Utc::now());

    let position = game.position();
    println!(
        "Move {}, {} to play",
        position.last_move_number(),
        position.next_to_move()
    );
    print!("{position}");
    if let Some(clock) = game.clock() {
        for color in [StoneColor::Black, StoneColor::White] {
            let left = clock
                .time(color)
                .time_left()
                .map_or_else(|| "-".to_string(), |s| format!("{s:.0}s"));
            println!("{color}: {left}");
        }
    }
    let scores = game.compute_scores();
    println!(
        "Black {:.1}, White {:.1}",
        scores.black.total, scores.white.total
    );

    if estimate {
        let game = Arc::new(Mutex::new(game));
        let task = estimation::spawn_estimate(
            game.clone(),
            Arc::new(PlayoutEstimator::default()),
            &config,
        )
        .await;
        if task.wait().await {
            let game = game.lock().await;
            let position = game.position();
            if let Some(ownership) = position.estimated_territory() {
                for row in ownership.chunks(position.width() as usize) {
                    let line: String = row
                        .iter()
                        .map(|s| match s {
                            PointState::Empty => '.',
                            PointState::Occupied(StoneColor::Black) => 'X',
                            PointState::Occupied(StoneColor::White) => 'O',
                        })
                        .collect();
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}
