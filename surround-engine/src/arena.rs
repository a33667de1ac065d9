use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::MoveError;
use crate::moves::Move;
use crate::position::BoardPosition;
use crate::scoring::GameScores;
use crate::stone::PointState;

/// Stable handle to a position stored in a [`PositionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub usize);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only store of every position a game has produced.
///
/// Positions are never removed, so an id handed out once stays valid even after the
/// move tree forgets about it.
#[derive(Debug, Clone)]
pub struct PositionArena {
    positions: Vec<BoardPosition>,
}

impl PositionArena {
    pub fn new(initial: BoardPosition) -> (Self, PositionId) {
        let arena = PositionArena {
            positions: vec![initial],
        };
        (arena, PositionId(0))
    }

    pub fn get(&self, id: PositionId) -> &BoardPosition {
        &self.positions[id.0]
    }

    pub fn previous(&self, id: PositionId) -> Option<PositionId> {
        self.get(id).previous()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Play a move from `from`, checking ko against the position before `from`.
    /// Nothing is stored when the move is rejected.
    pub fn make_move(
        &mut self,
        from: PositionId,
        mv: Move,
        allow_self_capture: bool,
    ) -> Result<PositionId, MoveError> {
        let source = self.get(from);
        let ko_reference = source.previous().map(|p| self.get(p));
        let next = source.make_move(mv, allow_self_capture, ko_reference)?;
        Ok(self.append(from, next))
    }

    pub fn make_handicap_placement(
        &mut self,
        from: PositionId,
        mv: Move,
    ) -> Result<PositionId, MoveError> {
        let next = self.get(from).make_handicap_placement(mv)?;
        Ok(self.append(from, next))
    }

    /// Store a position derived from `from` by the caller.
    pub fn append(&mut self, from: PositionId, mut position: BoardPosition) -> PositionId {
        assert!(from.0 < self.positions.len(), "unknown parent position {from}");
        position.set_previous(from);
        let id = PositionId(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Walk `previous` links from `id` back to the root, `id` first.
    pub fn history(&self, id: PositionId) -> impl Iterator<Item = PositionId> + '_ {
        std::iter::successors(Some(id), move |&p| self.previous(p))
    }

    // -- Annotations of the current position --

    pub fn set_removed_stones(&mut self, id: PositionId, removed: Option<BTreeSet<Point>>) {
        self.positions[id.0].set_removed_stones(removed);
    }

    pub fn set_game_scores(&mut self, id: PositionId, scores: Option<GameScores>) {
        self.positions[id.0].set_game_scores(scores);
    }

    pub fn set_estimated_territory(&mut self, id: PositionId, estimate: Option<Vec<PointState>>) {
        self.positions[id.0].set_estimated_territory(estimate);
    }

    pub fn clear_annotations(&mut self, id: PositionId) {
        let position = &mut self.positions[id.0];
        position.set_removed_stones(None);
        position.set_game_scores(None);
        position.set_estimated_territory(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::{assert_layout, position_from_layout};
    use crate::stone::StoneColor;

    #[test]
    fn links_new_positions() {
        let (mut arena, root) = PositionArena::new(BoardPosition::new(5, 5));
        let a = arena.make_move(root, Move::PlaceStone(1, 1), false).unwrap();
        let b = arena.make_move(a, Move::PlaceStone(1, 2), false).unwrap();
        assert_eq!(arena.previous(b), Some(a));
        assert_eq!(arena.previous(a), Some(root));
        assert_eq!(arena.previous(root), None);
        assert_eq!(arena.history(b).collect::<Vec<_>>(), vec![b, a, root]);
        assert_eq!(arena.get(b).last_move_number(), 2);
    }

    #[test]
    fn rejected_move_stores_nothing() {
        let (mut arena, root) = PositionArena::new(BoardPosition::new(5, 5));
        let a = arena.make_move(root, Move::PlaceStone(1, 1), false).unwrap();
        assert_eq!(
            arena.make_move(a, Move::PlaceStone(1, 1), false),
            Err(MoveError::PointAlreadyOccupied)
        );
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn three_moves_on_empty_board() {
        let (mut arena, root) = PositionArena::new(BoardPosition::new(5, 5));
        let mut current = root;
        for mv in [
            Move::PlaceStone(1, 1),
            Move::PlaceStone(1, 2),
            Move::PlaceStone(2, 2),
        ] {
            current = arena.make_move(current, mv, false).unwrap();
        }
        let position = arena.get(current);
        assert_eq!(position.stone_count(StoneColor::Black), 2);
        assert_eq!(position.stone_count(StoneColor::White), 1);
        assert_eq!(position.captures().black, 0);
        assert_eq!(position.captures().white, 0);
    }

    #[test]
    fn ko_recapture_and_release() {
        let start = position_from_layout(&["--wb-", "-w-wb", "--wb-"], StoneColor::Black);
        let (mut arena, root) = PositionArena::new(start);
        let taken = arena.make_move(root, Move::PlaceStone(1, 2), false).unwrap();
        assert_layout(arena.get(taken), &["--wb-", "-wb-b", "--wb-"]);
        assert_eq!(
            arena.make_move(taken, Move::PlaceStone(1, 3), false),
            Err(MoveError::IllegalKoMove)
        );

        let elsewhere = arena.make_move(taken, Move::PlaceStone(0, 0), false).unwrap();
        let passed = arena.make_move(elsewhere, Move::Pass, false).unwrap();
        let retaken = arena.make_move(passed, Move::PlaceStone(1, 3), false).unwrap();
        assert_layout(arena.get(retaken), &["w-wb-", "-w-wb", "--wb-"]);
        assert_eq!(
            arena.make_move(retaken, Move::PlaceStone(1, 2), false),
            Err(MoveError::IllegalKoMove)
        );
    }

    #[test]
    fn intervening_passes_lift_ko() {
        let start = position_from_layout(&["--wb-", "-w-wb", "--wb-"], StoneColor::Black);
        let (mut arena, root) = PositionArena::new(start);
        let taken = arena.make_move(root, Move::PlaceStone(1, 2), false).unwrap();
        let white_pass = arena.make_move(taken, Move::Pass, false).unwrap();
        let black_pass = arena.make_move(white_pass, Move::Pass, false).unwrap();
        // Two plies back is now the post-capture board.
        assert!(arena.make_move(black_pass, Move::PlaceStone(1, 3), false).is_ok());
    }

    #[test]
    fn annotations_are_settable() {
        let (mut arena, root) = PositionArena::new(BoardPosition::new(3, 3));
        arena.set_removed_stones(root, Some([(0, 0)].into_iter().collect()));
        arena.set_estimated_territory(root, Some(vec![PointState::Empty; 9]));
        assert!(arena.get(root).is_removed((0, 0)));
        assert!(arena.get(root).estimated_territory().is_some());
        arena.clear_annotations(root);
        assert!(arena.get(root).removed_stones().is_none());
        assert!(arena.get(root).estimated_territory().is_none());
    }
}
