use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use surround_engine::{
    BoardPosition, Move, Point, PointState, PositionId, StoneColor, TerritoryEstimator,
    estimate_territory,
};
use tokio::task::JoinHandle;

use crate::SharedGame;
use crate::config::Config;

/// Cap on playout length, per board point.
const MOVES_PER_POINT: usize = 3;

fn is_own_eye(position: &BoardPosition, point: Point, color: StoneColor) -> bool {
    position
        .neighbors(point)
        .iter()
        .all(|&n| position.point_state(n) == PointState::Occupied(color))
}

/// Random legal moves from `start` until both sides pass, then every point left
/// empty goes to its first stone neighbour. Nobody fills a one-point eye of
/// their own.
fn play_till_end(start: &BoardPosition, rng: &mut SmallRng) -> Vec<i8> {
    let width = start.width();
    let height = start.height();
    let mut limit = MOVES_PER_POINT * start.board().len();
    let mut previous: Option<BoardPosition> = None;
    let mut position = start.clone();
    let mut consecutive_passes = 0;

    while consecutive_passes < 2 && limit > 0 {
        limit -= 1;
        let mover = position.next_to_move();
        let mut candidates: Vec<Point> = (0..height)
            .flat_map(|row| (0..width).map(move |column| (row, column)))
            .filter(|&p| position.point_state(p).is_empty() && !is_own_eye(&position, p, mover))
            .collect();

        let mut next = None;
        while !candidates.is_empty() {
            let (row, column) = candidates.swap_remove(rng.random_range(0..candidates.len()));
            if let Ok(played) =
                position.make_move(Move::PlaceStone(row, column), false, previous.as_ref())
            {
                next = Some(played);
                break;
            }
        }

        consecutive_passes = if next.is_some() { 0 } else { consecutive_passes + 1 };
        let next = match next {
            Some(played) => played,
            None => match position.make_move(Move::Pass, false, None) {
                Ok(passed) => passed,
                Err(_) => break,
            },
        };
        previous = Some(std::mem::replace(&mut position, next));
    }

    (0..height)
        .flat_map(|row| (0..width).map(move |column| (row, column)))
        .map(|p| {
            let owner = match position.point_state(p) {
                PointState::Empty => position
                    .neighbors(p)
                    .iter()
                    .map(|&n| position.point_state(n))
                    .find(|s| !s.is_empty())
                    .unwrap_or(PointState::Empty),
                stone => stone,
            };
            owner.to_int()
        })
        .collect()
}

/// Monte Carlo ownership estimate: average many random playouts and give a
/// point to a side when its mean exceeds the tolerance.
#[derive(Debug, Clone, Copy)]
pub struct PlayoutEstimator {
    seed: u64,
}

impl PlayoutEstimator {
    pub fn new(seed: u64) -> Self {
        PlayoutEstimator { seed }
    }
}

impl Default for PlayoutEstimator {
    fn default() -> Self {
        PlayoutEstimator::new(0x5E41_DEAD)
    }
}

impl TerritoryEstimator for PlayoutEstimator {
    fn estimate(
        &self,
        width: u8,
        height: u8,
        data: &[i8],
        player_to_move: i8,
        trials: u32,
        tolerance: f32,
    ) -> Vec<i8> {
        let size = width as usize * height as usize;
        if trials == 0 {
            return vec![0; size];
        }

        let mut start = BoardPosition::new(width, height);
        for (i, &v) in data.iter().enumerate() {
            if let Some(color) = StoneColor::from_int(v) {
                start.put_stone(((i / width as usize) as u8, (i % width as usize) as u8), color);
            }
        }
        let to_move = StoneColor::from_int(player_to_move).unwrap_or(StoneColor::Black);

        let mut black_wins = vec![0i32; size];
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..trials {
            let starting = if i % 2 == 0 { to_move } else { -to_move };
            let result = play_till_end(&start.clone().with_next_to_move(starting), &mut rng);
            for (v, &s) in result.iter().enumerate() {
                black_wins[v] += s as i32;
            }
        }

        black_wins
            .iter()
            .map(|&wins| {
                let mean = wins as f32 / trials as f32;
                if mean > tolerance {
                    1
                } else if mean < -tolerance {
                    -1
                } else {
                    0
                }
            })
            .collect()
    }
}

/// A territory estimate running off the game lock.
pub struct EstimationTask {
    position: PositionId,
    handle: JoinHandle<bool>,
}

impl EstimationTask {
    /// The position the estimate was started for.
    pub fn position(&self) -> PositionId {
        self.position
    }

    /// Drop the pending result. A playout already running finishes in the
    /// background but is never applied.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the estimate was applied to the game.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(applied) => applied,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                tracing::error!("Estimation task for {} failed: {e}", self.position);
                false
            }
        }
    }
}

/// Snapshot the current position, estimate it on the blocking pool, and hand the
/// result back to the game if that position is still current.
pub async fn spawn_estimate(
    game: SharedGame,
    estimator: Arc<dyn TerritoryEstimator>,
    config: &Config,
) -> EstimationTask {
    let (position, snapshot) = game.lock().await.estimation_snapshot();
    let trials = config.estimate_trials;
    let tolerance = config.estimate_tolerance;
    tracing::debug!("Estimating {position} with {trials} trials");

    let handle = tokio::spawn(async move {
        let ownership = tokio::task::spawn_blocking(move || {
            estimate_territory(&snapshot, estimator.as_ref(), trials, tolerance)
        })
        .await;
        match ownership {
            Ok(ownership) => game.lock().await.apply_estimate(position, ownership),
            Err(e) => {
                tracing::error!("Estimator panicked for {position}: {e}");
                false
            }
        }
    });

    EstimationTask { position, handle }
}
