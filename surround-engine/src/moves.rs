use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::CoordinateError;

const PASS: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    PlaceStone(u8, u8),
    Pass,
}

impl Move {
    /// Build a move from the service's `[column, row]` pair. A column of -1 is a pass.
    pub fn from_record(column: i32, row: i32) -> Result<Self, CoordinateError> {
        if column == -1 {
            return Ok(Move::Pass);
        }
        let row = index_from_int(row)?;
        let column = index_from_int(column)?;
        Ok(Move::PlaceStone(row, column))
    }

    pub fn point(self) -> Option<Point> {
        match self {
            Move::PlaceStone(row, column) => Some((row, column)),
            Move::Pass => None,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }

    /// Two letters, column first; a pass is `".."`.
    pub fn to_coordinates(self) -> String {
        match self {
            Move::PlaceStone(row, column) => encode_point((row, column)),
            Move::Pass => PASS.to_string(),
        }
    }

    pub fn from_coordinates(s: &str) -> Result<Self, CoordinateError> {
        if s == PASS {
            return Ok(Move::Pass);
        }
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(CoordinateError::OddLength(chars.len()));
        }
        let column = letter_index(chars[0])?;
        let row = letter_index(chars[1])?;
        Ok(Move::PlaceStone(row, column))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinates())
    }
}

impl std::str::FromStr for Move {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_coordinates(s)
    }
}

/// Concatenate `column,row` letter pairs, ordered by row then column.
pub fn encode_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> String {
    let ordered: BTreeSet<Point> = points.into_iter().copied().collect();
    ordered.into_iter().map(encode_point).collect()
}

pub fn decode_points(s: &str) -> Result<BTreeSet<Point>, CoordinateError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(CoordinateError::OddLength(chars.len()));
    }
    chars
        .chunks(2)
        .map(|pair| -> Result<Point, CoordinateError> {
            Ok((letter_index(pair[1])?, letter_index(pair[0])?))
        })
        .collect()
}

fn encode_point((row, column): Point) -> String {
    assert!(row < 26 && column < 26, "point ({row}, {column}) outside the coordinate alphabet");
    let mut s = String::with_capacity(2);
    s.push((b'a' + column) as char);
    s.push((b'a' + row) as char);
    s
}

fn letter_index(c: char) -> Result<u8, CoordinateError> {
    if c.is_ascii_lowercase() {
        Ok(c as u8 - b'a')
    } else {
        Err(CoordinateError::InvalidLetter(c))
    }
}

fn index_from_int(v: i32) -> Result<u8, CoordinateError> {
    u8::try_from(v)
        .ok()
        .filter(|&i| i < 26)
        .ok_or(CoordinateError::OutOfRange(v))
}
