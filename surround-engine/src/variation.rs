use std::collections::{BTreeMap, BTreeSet};

use crate::Point;
use crate::arena::{PositionArena, PositionId};
use crate::error::MoveError;
use crate::moves::Move;

/// Moves leading from `base` to `position`. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    pub base: PositionId,
    pub position: PositionId,
    pub moves: Vec<Move>,
}

impl Variation {
    /// Walk back from `position` until `base`. Stops early at a position with no
    /// move or no predecessor.
    pub fn between(arena: &PositionArena, position: PositionId, base: PositionId) -> Self {
        let mut moves = Vec::new();
        let mut current = position;
        while current != base {
            let Some(mv) = arena.get(current).last_move() else {
                break;
            };
            moves.push(mv);
            match arena.previous(current) {
                Some(previous) => current = previous,
                None => break,
            }
        }
        moves.reverse();
        Variation {
            base,
            position,
            moves,
        }
    }

    /// Play `moves` from `base`, storing every intermediate position.
    pub fn from_moves(
        arena: &mut PositionArena,
        base: PositionId,
        moves: Vec<Move>,
        allow_self_capture: bool,
    ) -> Result<Self, MoveError> {
        let mut position = base;
        for &mv in &moves {
            position = arena.make_move(position, mv, allow_self_capture)?;
        }
        Ok(Variation {
            base,
            position,
            moves,
        })
    }

    /// Move labels starting at 1, keeping only the first placement on each point.
    pub fn labels(&self) -> BTreeMap<usize, Point> {
        let mut seen = BTreeSet::new();
        let mut labels = BTreeMap::new();
        for (i, mv) in self.moves.iter().enumerate() {
            if let Some(point) = mv.point() {
                if seen.insert(point) {
                    labels.insert(i + 1, point);
                }
            }
        }
        labels
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
