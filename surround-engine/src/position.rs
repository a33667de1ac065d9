use std::collections::BTreeSet;
use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::arena::PositionId;
use crate::error::MoveError;
use crate::moves::Move;
use crate::scoring::GameScores;
use crate::stone::{PointState, StoneColor};
use crate::territory::{self, TerritoryGroup};

/// Largest side length the two-letter coordinate alphabet can address.
pub const MAX_BOARD_SIZE: u8 = 25;

/// Captures indexed by the capturing color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: StoneColor) -> u32 {
        match color {
            StoneColor::Black => self.black,
            StoneColor::White => self.white,
        }
    }

    fn add(&mut self, color: StoneColor, count: u32) {
        match color {
            StoneColor::Black => self.black += count,
            StoneColor::White => self.white += count,
        }
    }
}

/// A board snapshot after some move, linked to the position it was played from.
///
/// Once a position is stored in a [`PositionArena`](crate::PositionArena) its board and
/// history fields are frozen; only the removed stones, scores and estimated territory
/// annotations may still change, and only while it is the game's current position.
#[derive(Debug, Clone)]
pub struct BoardPosition {
    width: u8,
    height: u8,
    board: Vec<PointState>,
    next_to_move: StoneColor,
    previous: Option<PositionId>,
    last_move: Option<Move>,
    last_move_color: Option<StoneColor>,
    captures: Captures,
    last_move_number: u32,
    removed_stones: Option<BTreeSet<Point>>,
    game_scores: Option<GameScores>,
    estimated_territory: Option<Vec<PointState>>,
}

impl BoardPosition {
    /// An empty board with Black to move.
    pub fn new(width: u8, height: u8) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&width) && (1..=MAX_BOARD_SIZE).contains(&height),
            "unsupported board size {width}x{height}"
        );
        BoardPosition {
            width,
            height,
            board: vec![PointState::Empty; width as usize * height as usize],
            next_to_move: StoneColor::Black,
            previous: None,
            last_move: None,
            last_move_color: None,
            captures: Captures::new(),
            last_move_number: 0,
            removed_stones: None,
            game_scores: None,
            estimated_territory: None,
        }
    }

    pub fn with_next_to_move(mut self, color: StoneColor) -> Self {
        self.next_to_move = color;
        self
    }

    /// Setup-only stone placement: no captures, no legality checks.
    pub fn put_stone(&mut self, point: Point, color: StoneColor) {
        assert!(self.on_board(point), "setup stone {point:?} is off the board");
        let i = self.idx(point);
        self.board[i] = PointState::Occupied(color);
    }

    // -- Accessors --

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn board(&self) -> &[PointState] {
        &self.board
    }

    pub fn next_to_move(&self) -> StoneColor {
        self.next_to_move
    }

    pub fn previous(&self) -> Option<PositionId> {
        self.previous
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn last_move_color(&self) -> Option<StoneColor> {
        self.last_move_color
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn last_move_number(&self) -> u32 {
        self.last_move_number
    }

    pub fn removed_stones(&self) -> Option<&BTreeSet<Point>> {
        self.removed_stones.as_ref()
    }

    pub fn game_scores(&self) -> Option<&GameScores> {
        self.game_scores.as_ref()
    }

    pub fn estimated_territory(&self) -> Option<&[PointState]> {
        self.estimated_territory.as_deref()
    }

    pub fn is_removed(&self, point: Point) -> bool {
        self.removed_stones.as_ref().is_some_and(|r| r.contains(&point))
    }

    pub fn point_state(&self, point: Point) -> PointState {
        assert!(self.on_board(point), "point {point:?} is off the board");
        self.board[self.idx(point)]
    }

    pub fn on_board(&self, (row, column): Point) -> bool {
        row < self.height && column < self.width
    }

    pub fn stone_count(&self, color: StoneColor) -> usize {
        self.board
            .iter()
            .filter(|&&s| s == PointState::Occupied(color))
            .count()
    }

    /// Same stones on the same points. History, move number and captures are ignored.
    pub fn has_the_same_position(&self, other: &BoardPosition) -> bool {
        self.width == other.width && self.height == other.height && self.board == other.board
    }

    // -- Rule engine --

    /// Play `mv` for `next_to_move`.
    ///
    /// `ko_reference` is the position preceding `self`; a capture that recreates it
    /// is rejected. The returned position is not yet linked to `self`; the arena
    /// sets that link when it stores it.
    pub fn make_move(
        &self,
        mv: Move,
        allow_self_capture: bool,
        ko_reference: Option<&BoardPosition>,
    ) -> Result<BoardPosition, MoveError> {
        let (row, column) = match mv {
            Move::Pass => return Ok(self.successor(mv, self.next_to_move)),
            Move::PlaceStone(row, column) => (row, column),
        };
        let point = (row, column);
        if !self.on_board(point) {
            return Err(MoveError::NotOnBoard);
        }
        if !self.point_state(point).is_empty() {
            return Err(MoveError::PointAlreadyOccupied);
        }

        let mover = self.next_to_move;
        let mut position = self.successor(mv, mover);
        position.put_stone(point, mover);

        let mut has_capture = false;
        for neighbor in position.neighbors(point) {
            if position.point_state(neighbor) != PointState::Occupied(mover.opponent()) {
                continue;
            }
            // An earlier capture in this loop may already have emptied it.
            let group = position.stone_group(neighbor);
            if position.liberties(&group).is_empty() {
                position.capture_group(&group);
                has_capture = true;
            }
        }

        if has_capture {
            if ko_reference.is_some_and(|ko| ko.has_the_same_position(&position)) {
                return Err(MoveError::IllegalKoMove);
            }
        } else {
            let own_group = position.stone_group(point);
            if position.liberties(&own_group).is_empty() {
                if !allow_self_capture {
                    return Err(MoveError::SuicidalMove);
                }
                position.capture_group(&own_group);
            }
        }

        Ok(position)
    }

    /// Place a handicap stone for `next_to_move` without capture, ko or suicide checks.
    /// The same color stays to move.
    pub fn make_handicap_placement(&self, mv: Move) -> Result<BoardPosition, MoveError> {
        let point = mv.point().ok_or(MoveError::UnexpectedInvalidMove)?;
        if !self.on_board(point) {
            return Err(MoveError::NotOnBoard);
        }
        if !self.point_state(point).is_empty() {
            return Err(MoveError::PointAlreadyOccupied);
        }
        let mover = self.next_to_move;
        let mut position = self.successor(mv, mover).with_next_to_move(mover);
        position.put_stone(point, mover);
        Ok(position)
    }

    /// Region that toggles together when `point` is marked dead or alive.
    ///
    /// From a stone: same-colored stones with the same removed status, plus the empty
    /// points connecting them (of either status). From an empty point: the connected
    /// empty points only.
    pub fn group_for_stone_removal(&self, point: Point) -> BTreeSet<Point> {
        let origin = self.point_state(point);
        let origin_removed = self.is_removed(point);

        let mut region = BTreeSet::new();
        let mut stack = vec![point];
        while let Some(p) = stack.pop() {
            if !region.insert(p) {
                continue;
            }
            for n in self.neighbors(p) {
                if region.contains(&n) {
                    continue;
                }
                let joins = match (origin, self.point_state(n)) {
                    (_, PointState::Empty) => true,
                    (PointState::Occupied(color), PointState::Occupied(other)) => {
                        color == other && self.is_removed(n) == origin_removed
                    }
                    (PointState::Empty, PointState::Occupied(_)) => false,
                };
                if joins {
                    stack.push(n);
                }
            }
        }
        region
    }

    pub fn construct_territory_groups(&self) -> Vec<TerritoryGroup> {
        territory::construct_territory_groups(self)
    }

    // -- Estimation oracle boundary --

    /// Row-major `+1 / 0 / -1` snapshot of the board.
    pub fn estimation_input(&self) -> Vec<i8> {
        self.board.iter().map(|s| s.to_int()).collect()
    }

    /// Interpret an oracle result for this board back into point states.
    pub fn ownership_from_estimate(&self, estimate: &[i8]) -> Vec<PointState> {
        assert_eq!(
            estimate.len(),
            self.board.len(),
            "estimate does not match the board shape"
        );
        estimate.iter().map(|&v| PointState::from_int(v)).collect()
    }

    // -- Graph algorithms --

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (row, column): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if row > 0 {
            result.push((row - 1, column));
        }
        if column + 1 < self.width {
            result.push((row, column + 1));
        }
        if row + 1 < self.height {
            result.push((row + 1, column));
        }
        if column > 0 {
            result.push((row, column - 1));
        }
        result
    }

    /// Flood-fill the group of same-colored stones containing `point`.
    pub fn stone_group(&self, point: Point) -> Vec<Point> {
        let state = self.point_state(point);
        if state.is_empty() {
            return Vec::new();
        }

        let mut visited = vec![false; self.board.len()];
        let mut result = Vec::new();
        let mut stack = vec![point];

        while let Some(p) = stack.pop() {
            let vi = self.idx(p);
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            result.push(p);
            for n in self.neighbors(p) {
                if self.point_state(n) == state && !visited[self.idx(n)] {
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Empty points adjacent to any point of `group`.
    pub fn liberties(&self, group: &[Point]) -> Vec<Point> {
        let mut seen = vec![false; self.board.len()];
        let mut libs = Vec::new();
        for &p in group {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if !seen[ni] && self.point_state(n).is_empty() {
                    seen[ni] = true;
                    libs.push(n);
                }
            }
        }
        libs
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn idx(&self, (row, column): Point) -> usize {
        row as usize * self.width as usize + column as usize
    }

    pub(crate) fn set_previous(&mut self, previous: PositionId) {
        self.previous = Some(previous);
    }

    pub(crate) fn set_removed_stones(&mut self, removed: Option<BTreeSet<Point>>) {
        self.removed_stones = removed;
    }

    pub(crate) fn set_game_scores(&mut self, scores: Option<GameScores>) {
        self.game_scores = scores;
    }

    pub(crate) fn set_estimated_territory(&mut self, estimate: Option<Vec<PointState>>) {
        self.estimated_territory = estimate;
    }

    /// Copy of the board for the next move; annotations do not carry over.
    fn successor(&self, mv: Move, mover: StoneColor) -> BoardPosition {
        BoardPosition {
            width: self.width,
            height: self.height,
            board: self.board.clone(),
            next_to_move: self.next_to_move.opponent(),
            previous: None,
            last_move: Some(mv),
            last_move_color: Some(mover),
            captures: self.captures.clone(),
            last_move_number: self.last_move_number + 1,
            removed_stones: None,
            game_scores: None,
            estimated_territory: None,
        }
    }

    fn capture_group(&mut self, group: &[Point]) {
        let Some(&first) = group.first() else {
            return;
        };
        let color = self
            .point_state(first)
            .stone()
            .expect("captured group must consist of stones");

        for &p in group {
            let i = self.idx(p);
            self.board[i] = PointState::Empty;
        }
        self.captures.add(color.opponent(), group.len() as u32);
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(self.width as usize) {
            let line: String = row
                .iter()
                .map(|s| match s {
                    PointState::Empty => '.',
                    PointState::Occupied(StoneColor::Black) => 'x',
                    PointState::Occupied(StoneColor::White) => 'o',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
