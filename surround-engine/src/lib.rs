pub mod arena;
pub mod error;
pub mod estimate;
pub mod move_tree;
pub mod moves;
pub mod position;
pub mod scoring;
pub mod stone;
pub mod territory;
pub mod variation;

/// `(row, column)`, zero-based from the top-left corner.
pub type Point = (u8, u8);

pub use arena::{PositionArena, PositionId};
pub use error::{CoordinateError, MoveError};
pub use estimate::{TerritoryEstimator, estimate_territory};
pub use move_tree::MoveTree;
pub use moves::{Move, decode_points, encode_points};
pub use position::{BoardPosition, Captures, MAX_BOARD_SIZE};
pub use scoring::{GameScores, PlayerScore, ScoringRules, compute_scores};
pub use stone::{PointState, StoneColor};
pub use territory::{RegionKind, TerritoryGroup};
pub use variation::Variation;
