use std::sync::mpsc::{Receiver, channel};
use std::sync::{Arc, Mutex};

use serde_json::json;
use surround_client::config::Config;
use surround_client::services::estimation::{PlayoutEstimator, spawn_estimate};
use surround_engine::{Move, PointState, StoneColor, TerritoryEstimator};

use crate::common::shared;

/// Holds every estimate until the test lets it through.
struct Gated {
    release: Mutex<Receiver<()>>,
}

impl TerritoryEstimator for Gated {
    fn estimate(
        &self,
        _width: u8,
        _height: u8,
        data: &[i8],
        _player_to_move: i8,
        _trials: u32,
        _tolerance: f32,
    ) -> Vec<i8> {
        let _ = self.release.lock().unwrap().recv();
        vec![1; data.len()]
    }
}

fn gated() -> (Arc<Gated>, std::sync::mpsc::Sender<()>) {
    let (tx, rx) = channel();
    (
        Arc::new(Gated {
            release: Mutex::new(rx),
        }),
        tx,
    )
}

fn config() -> Config {
    Config {
        estimate_trials: 40,
        ..Config::default()
    }
}

#[tokio::test]
async fn estimate_lands_on_the_current_position() {
    // Three single-point eyes: every playout ends where it starts.
    let game = shared(json!({
        "width": 5, "height": 1, "initial_state": {"black": "bada", "white": ""}
    }));
    let task = spawn_estimate(game.clone(), Arc::new(PlayoutEstimator::default()), &config()).await;
    assert_eq!(task.position(), game.lock().await.current());
    assert!(task.wait().await);

    let game = game.lock().await;
    let estimate = game.position().estimated_territory().unwrap();
    assert_eq!(estimate, &[PointState::Occupied(StoneColor::Black); 5]);
}

/// A move made while the estimate runs makes the result stale.
#[tokio::test]
async fn stale_estimate_is_dropped() {
    let game = shared(json!({"width": 5, "height": 5}));
    let (estimator, release) = gated();
    let task = spawn_estimate(game.clone(), estimator, &config()).await;
    let started_at = task.position();

    game.lock().await.play(Move::PlaceStone(2, 2)).unwrap();
    release.send(()).unwrap();
    assert!(!task.wait().await);

    let game = game.lock().await;
    assert!(game.position().estimated_territory().is_none());
    assert!(game.arena().get(started_at).estimated_territory().is_none());
}

#[tokio::test]
async fn cancelled_estimate_is_never_applied() {
    let game = shared(json!({"width": 5, "height": 5}));
    let (estimator, release) = gated();
    let task = spawn_estimate(game.clone(), estimator, &config()).await;

    task.cancel();
    let _ = release.send(());
    assert!(!task.wait().await);
    assert!(game.lock().await.position().estimated_territory().is_none());
}
