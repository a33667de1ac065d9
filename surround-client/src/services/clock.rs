use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surround_engine::StoneColor;

use crate::models::pause_control::PauseControl;
use crate::models::time_control::TimeControlSystem;

/// One player's remaining time, in seconds.
///
/// The plain fields come from the server; the `*_left` fields are derived from them
/// on every tick and never sent back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinkingTime {
    pub thinking_time: Option<f64>,
    pub thinking_time_left: Option<f64>,
    // byo-yomi
    pub periods: Option<u32>,
    pub periods_left: Option<u32>,
    pub period_time: Option<f64>,
    pub period_time_left: Option<f64>,
    // canadian
    pub moves_left: Option<u32>,
    pub block_time: Option<f64>,
    pub block_time_left: Option<f64>,
}

impl ThinkingTime {
    pub fn from_seconds(seconds: f64) -> Self {
        let mut time = ThinkingTime {
            thinking_time: Some(seconds),
            ..Default::default()
        };
        time.reset_left();
        time
    }

    fn reset_left(&mut self) {
        self.thinking_time_left = self.thinking_time;
        self.periods_left = self.periods;
        self.period_time_left = self.period_time;
        self.block_time_left = self.block_time;
    }

    /// The figure a clock face shows: overtime once main time is used up.
    pub fn time_left(&self) -> Option<f64> {
        if self.thinking_time_left == Some(0.0) {
            self.period_time_left
                .or(self.block_time_left)
                .or(self.thinking_time_left)
        } else {
            self.thinking_time_left
                .or(self.period_time_left)
                .or(self.block_time_left)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThinkingTimePayload {
    Seconds(f64),
    Detailed(ThinkingTime),
}

impl From<ThinkingTimePayload> for ThinkingTime {
    fn from(payload: ThinkingTimePayload) -> Self {
        match payload {
            ThinkingTimePayload::Seconds(seconds) => ThinkingTime::from_seconds(seconds),
            ThinkingTimePayload::Detailed(mut time) => {
                time.reset_left();
                time
            }
        }
    }
}

/// Clock message as the service sends it. Timestamps are epoch milliseconds.
#[derive(Deserialize)]
struct ClockPayload {
    black_time: ThinkingTimePayload,
    white_time: ThinkingTimePayload,
    black_player_id: i64,
    white_player_id: i64,
    current_player: i64,
    last_move: f64,
    #[serde(default)]
    start_mode: Option<Value>,
    paused_since: Option<f64>,
    expiration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ClockPayload")]
pub struct Clock {
    pub black_time: ThinkingTime,
    pub white_time: ThinkingTime,
    pub black_player_id: i64,
    pub white_player_id: i64,
    pub current_player_id: i64,
    pub current_player: StoneColor,
    pub last_move: DateTime<Utc>,
    pub started: bool,
    pub paused_since: Option<DateTime<Utc>>,
    /// When the current countdown (move, stone removal or start) runs out.
    pub expiration: Option<DateTime<Utc>>,
}

impl TryFrom<ClockPayload> for Clock {
    type Error = String;

    fn try_from(payload: ClockPayload) -> Result<Self, Self::Error> {
        let current_player = match payload.current_player {
            id if id == payload.black_player_id => StoneColor::Black,
            id if id == payload.white_player_id => StoneColor::White,
            id => return Err(format!("current player {id} is neither black nor white")),
        };
        Ok(Clock {
            black_time: payload.black_time.into(),
            white_time: payload.white_time.into(),
            black_player_id: payload.black_player_id,
            white_player_id: payload.white_player_id,
            current_player_id: payload.current_player,
            current_player,
            last_move: timestamp(payload.last_move)?,
            started: payload.start_mode.is_none(),
            paused_since: payload.paused_since.map(timestamp).transpose()?,
            expiration: payload.expiration.map(timestamp).transpose()?,
        })
    }
}

/// `time` moved by the server clock offset, or `None` past chrono's range.
fn shifted(time: DateTime<Utc>, offset_ms: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_milliseconds(offset_ms).and_then(|d| time.checked_add_signed(d))
}

fn timestamp(millis: f64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| format!("timestamp {millis} out of range"))
}

impl Clock {
    pub fn time(&self, color: StoneColor) -> &ThinkingTime {
        match color {
            StoneColor::Black => &self.black_time,
            StoneColor::White => &self.white_time,
        }
    }

    fn time_mut(&mut self, color: StoneColor) -> &mut ThinkingTime {
        match color {
            StoneColor::Black => &mut self.black_time,
            StoneColor::White => &mut self.white_time,
        }
    }

    pub fn player_id(&self, color: StoneColor) -> i64 {
        match color {
            StoneColor::Black => self.black_player_id,
            StoneColor::White => self.white_player_id,
        }
    }

    /// Whole seconds the current player has been thinking, as the server counts them.
    /// `None` when the offset pushes the last move outside the representable range.
    pub fn seconds_elapsed(
        &self,
        server_time_offset_ms: i64,
        pause_control: Option<&PauseControl>,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        let paused = pause_control.is_some_and(PauseControl::is_paused);
        let since = match self.paused_since {
            Some(paused_since) if paused => paused_since.max(self.last_move),
            _ => now,
        };
        let reference = shifted(self.last_move, server_time_offset_ms)?;
        Some((since - reference).num_milliseconds().div_euclid(1000))
    }

    /// Recompute the current player's `*_left` fields for `now`. The other player's
    /// time is left alone, as is everything before the clock has started.
    pub fn calculate_time_left(
        &mut self,
        system: &TimeControlSystem,
        server_time_offset_ms: i64,
        pause_control: Option<&PauseControl>,
        now: DateTime<Utc>,
    ) {
        if !self.started {
            return;
        }
        let Some(elapsed) = self.seconds_elapsed(server_time_offset_ms, pause_control, now) else {
            tracing::warn!("Server time offset {server_time_offset_ms}ms is out of range");
            return;
        };
        if elapsed <= 0 {
            return;
        }
        let elapsed = elapsed as f64;
        let current = self.current_player;
        let time = self.time_mut(current);
        let Some(main_time) = time.thinking_time else {
            return;
        };

        match *system {
            TimeControlSystem::ByoYomi { period_time, .. } => {
                let mut left = main_time - elapsed;
                if left > 0.0 {
                    time.thinking_time_left = Some(left);
                } else {
                    time.thinking_time_left = Some(0.0);
                    let period_time = period_time as f64;
                    let mut periods_left = time.periods.unwrap_or(0);
                    // The period being played now is not counted off.
                    left += period_time;
                    while left < 0.0 && periods_left > 0 {
                        left += period_time;
                        periods_left -= 1;
                    }
                    time.periods_left = Some(periods_left);
                    time.period_time_left = Some(left.max(0.0));
                }
            }
            TimeControlSystem::Canadian { period_time, .. } => {
                let left = main_time - elapsed;
                if left > 0.0 {
                    time.thinking_time_left = Some(left);
                } else {
                    time.thinking_time_left = Some(0.0);
                    time.block_time_left = Some(left + period_time as f64);
                }
            }
            TimeControlSystem::Fischer { .. }
            | TimeControlSystem::Simple { .. }
            | TimeControlSystem::Absolute { .. } => {
                time.thinking_time_left = Some(main_time - elapsed);
            }
            TimeControlSystem::None => {}
        }
    }

    pub fn time_until_expiration(
        &self,
        server_time_offset_ms: i64,
        now: DateTime<Utc>,
    ) -> Option<TimeDelta> {
        self.expiration
            .and_then(|e| shifted(e, server_time_offset_ms))
            .map(|e| e - now)
    }
}
