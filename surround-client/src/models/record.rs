use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use surround_engine::{
    CoordinateError, GameScores, Move, PlayerScore, ScoringRules, StoneColor, decode_points,
};

use crate::models::pause_control::PauseControl;
use crate::models::time_control::TimeControl;
use crate::services::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[serde(rename = "play")]
    Play,
    #[serde(rename = "stone removal")]
    StoneRemoval,
    #[serde(rename = "finished")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rules {
    Chinese,
    Aga,
    Japanese,
    Korean,
    Ing,
    Nz,
}

impl Rules {
    pub fn default_komi(self) -> f64 {
        match self {
            Rules::Chinese | Rules::Aga => 7.5,
            Rules::Japanese | Rules::Korean => 6.5,
            Rules::Ing => 8.0,
            Rules::Nz => 7.0,
        }
    }
}

/// Setup stones as coordinate strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub black: String,
    #[serde(default)]
    pub white: String,
}

/// One entry of the record's move list: `[column, row, timedelta?, ...]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct RecordMove {
    pub column: i32,
    pub row: i32,
    pub timedelta: Option<f64>,
}

impl TryFrom<Vec<Value>> for RecordMove {
    type Error = String;

    fn try_from(entry: Vec<Value>) -> Result<Self, Self::Error> {
        let coordinate = |i: usize| {
            entry
                .get(i)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| format!("move entry {entry:?} lacks coordinate {i}"))
        };
        Ok(RecordMove {
            column: coordinate(0)?,
            row: coordinate(1)?,
            timedelta: entry.get(2).and_then(Value::as_f64),
        })
    }
}

impl RecordMove {
    pub fn to_move(&self) -> Result<Move, CoordinateError> {
        Move::from_record(self.column, self.row)
    }
}

/// A player's score as the server reports it; positions are a coordinate string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerPlayerScore {
    #[serde(default)]
    pub handicap: u32,
    #[serde(default)]
    pub komi: f64,
    #[serde(default)]
    pub scoring_positions: String,
    #[serde(default)]
    pub stones: u32,
    #[serde(default)]
    pub territory: u32,
    #[serde(default)]
    pub prisoners: u32,
    #[serde(default)]
    pub total: f64,
}

impl ServerPlayerScore {
    fn to_player_score(&self) -> Result<PlayerScore, CoordinateError> {
        Ok(PlayerScore {
            handicap: self.handicap,
            komi: self.komi,
            scoring_positions: decode_points(&self.scoring_positions)?,
            stones: self.stones,
            territory: self.territory,
            prisoners: self.prisoners,
            total: self.total,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerScores {
    pub black: ServerPlayerScore,
    pub white: ServerPlayerScore,
}

impl ServerScores {
    pub fn to_game_scores(&self) -> Result<GameScores, CoordinateError> {
        Ok(GameScores {
            black: self.black.to_player_score()?,
            white: self.white.to_player_score()?,
        })
    }
}

/// Game record as served by the game service.
#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub game_id: i64,
    pub game_name: Option<String>,
    pub width: u8,
    pub height: u8,
    #[serde(default)]
    pub black_player_id: i64,
    #[serde(default)]
    pub white_player_id: i64,
    #[serde(default)]
    pub handicap: u32,
    #[serde(default)]
    pub free_handicap_placement: bool,
    #[serde(default = "black", deserialize_with = "color_name")]
    pub initial_player: StoneColor,
    #[serde(default)]
    pub initial_state: InitialState,
    #[serde(default)]
    pub moves: Vec<RecordMove>,
    pub komi: Option<f64>,
    pub rules: Option<Rules>,
    #[serde(default)]
    pub allow_self_capture: bool,
    pub removed: Option<String>,
    pub score: Option<ServerScores>,
    #[serde(default)]
    pub score_territory: bool,
    #[serde(default)]
    pub score_stones: bool,
    #[serde(default)]
    pub score_prisoners: bool,
    #[serde(default)]
    pub score_handicap: bool,
    #[serde(default)]
    pub aga_handicap_scoring: bool,
    #[serde(default = "play")]
    pub phase: GamePhase,
    pub time_control: Option<TimeControl>,
    pub clock: Option<Clock>,
    pub pause_control: Option<PauseControl>,
    pub outcome: Option<String>,
    pub winner: Option<i64>,
}

fn black() -> StoneColor {
    StoneColor::Black
}

fn play() -> GamePhase {
    GamePhase::Play
}

fn color_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StoneColor, D::Error> {
    let name = String::deserialize(deserializer)?;
    match name.as_str() {
        "black" => Ok(StoneColor::Black),
        "white" => Ok(StoneColor::White),
        other => Err(serde::de::Error::custom(format!("unknown color {other:?}"))),
    }
}

impl GameRecord {
    /// Explicit komi, else the ruleset's default, else none.
    pub fn effective_komi(&self) -> f64 {
        self.komi
            .or(self.rules.map(Rules::default_komi))
            .unwrap_or(0.0)
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules {
            territory: self.score_territory,
            stones: self.score_stones,
            prisoners: self.score_prisoners,
            handicap: self.score_handicap,
            aga_handicap: self.aga_handicap_scoring,
            komi: self.effective_komi(),
            handicap_count: self.handicap,
        }
    }
}
