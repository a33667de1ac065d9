use std::fmt;

/// Why a move could not be applied to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    PointAlreadyOccupied,
    IllegalKoMove,
    SuicidalMove,
    UnexpectedInvalidMove,
    NotOnBoard,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::PointAlreadyOccupied => write!(f, "point already occupied"),
            MoveError::IllegalKoMove => write!(f, "illegal ko move"),
            MoveError::SuicidalMove => write!(f, "suicidal move"),
            MoveError::UnexpectedInvalidMove => write!(f, "unexpected invalid move"),
            MoveError::NotOnBoard => write!(f, "not on board"),
        }
    }
}

impl std::error::Error for MoveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    OddLength(usize),
    InvalidLetter(char),
    /// A numeric coordinate with no letter in `a..=z`.
    OutOfRange(i32),
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::OddLength(len) => {
                write!(f, "coordinate string has odd length {len}")
            }
            CoordinateError::InvalidLetter(c) => write!(f, "invalid coordinate letter '{c}'"),
            CoordinateError::OutOfRange(v) => write!(f, "coordinate {v} is out of range"),
        }
    }
}

impl std::error::Error for CoordinateError {}
