use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::position::BoardPosition;
use crate::stone::{PointState, StoneColor};

/// Which components count toward the score. Supplied by the game record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringRules {
    pub territory: bool,
    pub stones: bool,
    pub prisoners: bool,
    pub handicap: bool,
    pub aga_handicap: bool,
    pub komi: f64,
    pub handicap_count: u32,
}

impl ScoringRules {
    /// Territory plus prisoners, the Japanese-style count.
    pub fn territory_scoring(komi: f64) -> Self {
        ScoringRules {
            territory: true,
            prisoners: true,
            komi,
            ..Default::default()
        }
    }

    /// Territory plus stones on the board, the Chinese-style count.
    pub fn area_scoring(komi: f64) -> Self {
        ScoringRules {
            territory: true,
            stones: true,
            komi,
            ..Default::default()
        }
    }

    /// Points white receives for black's handicap stones.
    pub fn white_handicap_points(&self) -> u32 {
        if !self.handicap || self.handicap_count == 0 {
            0
        } else if self.aga_handicap {
            self.handicap_count - 1
        } else {
            self.handicap_count
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerScore {
    pub handicap: u32,
    pub komi: f64,
    pub scoring_positions: BTreeSet<Point>,
    pub stones: u32,
    pub territory: u32,
    pub prisoners: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameScores {
    pub black: PlayerScore,
    pub white: PlayerScore,
}

impl GameScores {
    pub fn get(&self, color: StoneColor) -> &PlayerScore {
        match color {
            StoneColor::Black => &self.black,
            StoneColor::White => &self.white,
        }
    }

    fn get_mut(&mut self, color: StoneColor) -> &mut PlayerScore {
        match color {
            StoneColor::Black => &mut self.black,
            StoneColor::White => &mut self.white,
        }
    }

    /// Black's total minus white's total.
    pub fn margin(&self) -> f64 {
        self.black.total - self.white.total
    }

    pub fn winner(&self) -> Option<StoneColor> {
        let margin = self.margin();
        if margin > 0.0 {
            Some(StoneColor::Black)
        } else if margin < 0.0 {
            Some(StoneColor::White)
        } else {
            None
        }
    }
}

/// Score `position` as marked by its removed stones.
pub fn compute_scores(position: &BoardPosition, rules: &ScoringRules) -> GameScores {
    let mut scores = GameScores::default();

    if rules.territory {
        for group in position.construct_territory_groups() {
            if let Some(owner) = group.owner() {
                let score = scores.get_mut(owner);
                score.territory += group.len() as u32;
                score.scoring_positions.extend(group.points.iter().copied());
            }
        }
    }

    for row in 0..position.height() {
        for column in 0..position.width() {
            let point = (row, column);
            let PointState::Occupied(color) = position.point_state(point) else {
                continue;
            };
            if position.is_removed(point) {
                if rules.prisoners {
                    scores.get_mut(color.opponent()).prisoners += 1;
                }
            } else if rules.stones {
                let score = scores.get_mut(color);
                score.stones += 1;
                score.scoring_positions.insert(point);
            }
        }
    }

    if rules.prisoners {
        scores.black.prisoners += position.captures().black;
        scores.white.prisoners += position.captures().white;
    }

    scores.white.komi = rules.komi;
    scores.white.handicap = rules.white_handicap_points();

    for score in [&mut scores.black, &mut scores.white] {
        score.total = (score.territory + score.stones + score.prisoners + score.handicap) as f64
            + score.komi;
    }

    scores
}
