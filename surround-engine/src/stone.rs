use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::ops::Neg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum StoneColor {
    Black = 1,
    White = -1,
}

impl StoneColor {
    pub fn from_int(v: i8) -> Option<Self> {
        match v.signum() {
            1 => Some(StoneColor::Black),
            -1 => Some(StoneColor::White),
            _ => None,
        }
    }

    pub fn to_int(self) -> i8 {
        self as i8
    }

    pub fn opponent(self) -> Self {
        match self {
            StoneColor::Black => StoneColor::White,
            StoneColor::White => StoneColor::Black,
        }
    }
}

impl Neg for StoneColor {
    type Output = Self;

    fn neg(self) -> Self {
        self.opponent()
    }
}

impl fmt::Display for StoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoneColor::Black => write!(f, "Black"),
            StoneColor::White => write!(f, "White"),
        }
    }
}

/// Content of a single intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointState {
    #[default]
    Empty,
    Occupied(StoneColor),
}

impl PointState {
    pub fn stone(self) -> Option<StoneColor> {
        match self {
            PointState::Empty => None,
            PointState::Occupied(color) => Some(color),
        }
    }

    pub fn is_empty(self) -> bool {
        self == PointState::Empty
    }

    /// `0` for empty, otherwise the stone's signed value.
    pub fn to_int(self) -> i8 {
        self.stone().map_or(0, StoneColor::to_int)
    }

    pub fn from_int(v: i8) -> Self {
        StoneColor::from_int(v).map_or(PointState::Empty, PointState::Occupied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_int_normalizes() {
        assert_eq!(StoneColor::from_int(1), Some(StoneColor::Black));
        assert_eq!(StoneColor::from_int(7), Some(StoneColor::Black));
        assert_eq!(StoneColor::from_int(-1), Some(StoneColor::White));
        assert_eq!(StoneColor::from_int(-42), Some(StoneColor::White));
        assert_eq!(StoneColor::from_int(0), None);
    }

    #[test]
    fn opponent() {
        assert_eq!(StoneColor::Black.opponent(), StoneColor::White);
        assert_eq!(StoneColor::White.opponent(), StoneColor::Black);
        assert_eq!(-StoneColor::Black, StoneColor::White);
    }

    #[test]
    fn point_state_ints() {
        assert_eq!(PointState::Empty.to_int(), 0);
        assert_eq!(PointState::Occupied(StoneColor::Black).to_int(), 1);
        assert_eq!(PointState::Occupied(StoneColor::White).to_int(), -1);
        assert_eq!(PointState::from_int(-3), PointState::Occupied(StoneColor::White));
        assert_eq!(PointState::from_int(0), PointState::Empty);
    }

    #[test]
    fn color_serializes_as_sign() {
        assert_eq!(serde_json::to_string(&StoneColor::White).unwrap(), "-1");
        let c: StoneColor = serde_json::from_str("1").unwrap();
        assert_eq!(c, StoneColor::Black);
    }
}
