use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use surround_engine::{
    BoardPosition, GameScores, MAX_BOARD_SIZE, Move, MoveTree, Point, PointState, PositionArena,
    PositionId, StoneColor, Variation, decode_points,
};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::pause_control::PauseControl;
use crate::models::record::{GamePhase, GameRecord};
use crate::models::time_control::TimeControlSystem;
use crate::services::clock::Clock;

/// Points whose dead/alive status a removal click flips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalToggle {
    /// Currently marked removed; the click brings them back.
    pub restore: BTreeSet<Point>,
    /// Currently alive; the click marks them removed.
    pub remove: BTreeSet<Point>,
}

impl RemovalToggle {
    pub fn is_empty(&self) -> bool {
        self.restore.is_empty() && self.remove.is_empty()
    }
}

/// One game as the client sees it: every position played or analysed, the move
/// tree over them, and the clock.
#[derive(Debug)]
pub struct Game {
    record: GameRecord,
    arena: PositionArena,
    tree: MoveTree,
    current: PositionId,
    phase: GamePhase,
    time_control: TimeControlSystem,
    clock: Option<Clock>,
    pause_control: Option<PauseControl>,
    server_time_offset_ms: i64,
}

impl Game {
    /// Rebuild the game from a record: setup stones, handicap placements, then the
    /// played moves on the main line.
    pub fn from_record(record: GameRecord) -> Result<Self, AppError> {
        let size_range = 1..=MAX_BOARD_SIZE;
        if !size_range.contains(&record.width) || !size_range.contains(&record.height) {
            return Err(AppError::InvalidRecord(format!(
                "unsupported board size {}x{}",
                record.width, record.height
            )));
        }

        let black_setup = decode_points(&record.initial_state.black)?;
        let white_setup = decode_points(&record.initial_state.white)?;
        let has_setup = !black_setup.is_empty() || !white_setup.is_empty();
        let handicap = record.handicap as usize;
        let places_handicap = handicap > 0 && record.moves.len() >= handicap && !has_setup;

        let first_to_move = if places_handicap {
            StoneColor::Black
        } else {
            record.initial_player
        };
        let mut initial =
            BoardPosition::new(record.width, record.height).with_next_to_move(first_to_move);
        let setup = [
            (&black_setup, StoneColor::Black),
            (&white_setup, StoneColor::White),
        ];
        for (points, color) in setup {
            for &point in points {
                if !initial.on_board(point) {
                    return Err(AppError::InvalidRecord(format!(
                        "setup stone {point:?} is off the board"
                    )));
                }
                initial.put_stone(point, color);
            }
        }

        let (mut arena, root) = PositionArena::new(initial);
        let mut tree = MoveTree::new(&arena, root);
        let mut current = root;

        let first_move = if places_handicap { handicap } else { 0 };
        for (i, entry) in record.moves[..first_move].iter().enumerate() {
            let mut placed = arena.get(current).make_handicap_placement(entry.to_move()?)?;
            if i + 1 == handicap {
                placed = placed.with_next_to_move(record.initial_player);
            }
            let id = arena.append(current, placed);
            current = tree.register(&arena, id, current, true);
        }
        for entry in &record.moves[first_move..] {
            let id = arena.make_move(current, entry.to_move()?, record.allow_self_capture)?;
            current = tree.register(&arena, id, current, true);
        }

        if let Some(removed) = &record.removed {
            let removed = decode_points(removed)?;
            if !removed.is_empty() {
                arena.set_removed_stones(current, Some(removed));
            }
        }
        if let Some(score) = &record.score {
            arena.set_game_scores(current, Some(score.to_game_scores()?));
        }

        info!(
            "Loaded game {} ({}x{}, {} moves, phase {:?})",
            record.game_id,
            record.width,
            record.height,
            record.moves.len(),
            record.phase
        );

        Ok(Game {
            phase: record.phase,
            time_control: record
                .time_control
                .as_ref()
                .map_or(TimeControlSystem::None, |tc| tc.system()),
            clock: record.clock.clone(),
            pause_control: record.pause_control.clone(),
            server_time_offset_ms: 0,
            record,
            arena,
            tree,
            current,
        })
    }

    // -- Accessors --

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn arena(&self) -> &PositionArena {
        &self.arena
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn current(&self) -> PositionId {
        self.current
    }

    pub fn position(&self) -> &BoardPosition {
        self.arena.get(self.current)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    pub fn time_control(&self) -> TimeControlSystem {
        self.time_control
    }

    pub fn pause_control(&self) -> Option<&PauseControl> {
        self.pause_control.as_ref()
    }

    pub fn set_server_time_offset(&mut self, offset_ms: i64) {
        self.server_time_offset_ms = offset_ms;
    }

    // -- Moves --

    /// Play on the main line from the current position and make the result current.
    pub fn play(&mut self, mv: Move) -> Result<PositionId, AppError> {
        let new = match self
            .arena
            .make_move(self.current, mv, self.record.allow_self_capture)
        {
            Ok(id) => id,
            Err(e) => {
                warn!("Rejected {} at {}: {e}", mv.to_coordinates(), self.current);
                return Err(e.into());
            }
        };
        let id = self.tree.register(&self.arena, new, self.current, true);
        self.arena.clear_annotations(self.current);
        debug!(
            "Played {} as move {}",
            mv.to_coordinates(),
            self.arena.get(id).last_move_number()
        );
        self.current = id;
        Ok(id)
    }

    /// Explore `mv` from any position in the tree without leaving the current one.
    pub fn analyze(&mut self, from: PositionId, mv: Move) -> Result<PositionId, AppError> {
        if !self.tree.contains(from) {
            return Err(AppError::UnknownPosition(from));
        }
        let new = match self
            .arena
            .make_move(from, mv, self.record.allow_self_capture)
        {
            Ok(id) => id,
            Err(e) => {
                warn!("Rejected analysis move {} at {from}: {e}", mv.to_coordinates());
                return Err(e.into());
            }
        };
        let id = self.tree.register(&self.arena, new, from, false);
        debug!("Registered variation {} from {from} as {id}", mv.to_coordinates());
        Ok(id)
    }

    /// Drop the current position and everything after it, stepping back one move.
    /// Returns the new current position, or `None` at the root.
    pub fn undo(&mut self) -> Option<PositionId> {
        if self.current == self.tree.root() {
            return None;
        }
        let previous = self.arena.previous(self.current)?;
        self.tree.remove_data(&self.arena, self.current);
        self.arena.clear_annotations(self.current);
        debug!("Undid {}, back to {previous}", self.current);
        self.current = previous;
        Some(previous)
    }

    pub fn variation_to(&self, id: PositionId) -> Option<Variation> {
        self.tree.variation(&self.arena, id)
    }

    // -- Stone removal and scoring --

    /// The points a click on `point` would flip. Clicking a stone flips the stones
    /// of its region; clicking an empty point flips the region's empty points (dame).
    pub fn removal_toggle(&self, point: Point) -> Result<RemovalToggle, AppError> {
        let position = self.position();
        if !position.on_board(point) {
            return Err(AppError::InvalidRecord(format!(
                "removal point {point:?} is off the board"
            )));
        }
        let origin_is_stone = !position.point_state(point).is_empty();
        let mark_removed = !position.is_removed(point);

        let mut toggle = RemovalToggle::default();
        for p in position.group_for_stone_removal(point) {
            if position.point_state(p).is_empty() == origin_is_stone {
                continue;
            }
            if position.is_removed(p) == mark_removed {
                continue;
            }
            if mark_removed {
                toggle.remove.insert(p);
            } else {
                toggle.restore.insert(p);
            }
        }
        Ok(toggle)
    }

    pub fn apply_removal_toggle(&mut self, toggle: &RemovalToggle) {
        let mut removed = self
            .position()
            .removed_stones()
            .cloned()
            .unwrap_or_default();
        removed.extend(&toggle.remove);
        removed.retain(|p| !toggle.restore.contains(p));
        debug!(
            "Removal toggle: {} removed, {} restored",
            toggle.remove.len(),
            toggle.restore.len()
        );
        self.arena.set_removed_stones(self.current, Some(removed));
        self.arena.set_game_scores(self.current, None);
    }

    /// Replace the removed set with the service's encoded one.
    pub fn set_removed_stones(&mut self, encoded: &str) -> Result<(), AppError> {
        let removed = decode_points(encoded)?;
        self.arena.set_removed_stones(self.current, Some(removed));
        self.arena.set_game_scores(self.current, None);
        Ok(())
    }

    pub fn compute_scores(&mut self) -> GameScores {
        let scores =
            surround_engine::compute_scores(self.position(), &self.record.scoring_rules());
        self.arena.set_game_scores(self.current, Some(scores.clone()));
        scores
    }

    // -- Territory estimation --

    /// The current position and a copy of its board, for estimating off the lock.
    pub fn estimation_snapshot(&self) -> (PositionId, BoardPosition) {
        (self.current, self.position().clone())
    }

    /// Store an estimate computed for `position`. Ignored if the game has moved on.
    pub fn apply_estimate(&mut self, position: PositionId, ownership: Vec<PointState>) -> bool {
        if position != self.current {
            warn!(
                "Discarding territory estimate for {position}; current is {}",
                self.current
            );
            return false;
        }
        self.arena.set_estimated_territory(position, Some(ownership));
        info!("Territory estimate ready for {position}");
        true
    }

    // -- Clock --

    pub fn tick_clock(&mut self, now: DateTime<Utc>) {
        if let Some(clock) = &mut self.clock {
            clock.calculate_time_left(
                &self.time_control,
                self.server_time_offset_ms,
                self.pause_control.as_ref(),
                now,
            );
        }
    }

    pub fn update_clock(&mut self, clock: Clock) {
        self.clock = Some(clock);
    }

    pub fn update_pause_control(&mut self, pause_control: Option<PauseControl>) {
        self.pause_control = pause_control;
    }
}
