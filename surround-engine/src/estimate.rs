use crate::position::BoardPosition;
use crate::stone::PointState;

/// External territory estimation oracle.
///
/// `data` is the row-major board with `+1` black, `-1` white, `0` empty, and
/// `player_to_move` is `+1` or `-1`. The result has the same shape and encoding
/// and gives the expected final owner of every point.
pub trait TerritoryEstimator: Send + Sync {
    fn estimate(
        &self,
        width: u8,
        height: u8,
        data: &[i8],
        player_to_move: i8,
        trials: u32,
        tolerance: f32,
    ) -> Vec<i8>;
}

/// Snapshot `position`, run the oracle, and read the answer back as point states.
pub fn estimate_territory(
    position: &BoardPosition,
    estimator: &dyn TerritoryEstimator,
    trials: u32,
    tolerance: f32,
) -> Vec<PointState> {
    let data = position.estimation_input();
    let result = estimator.estimate(
        position.width(),
        position.height(),
        &data,
        position.next_to_move().to_int(),
        trials,
        tolerance,
    );
    position.ownership_from_estimate(&result)
}
