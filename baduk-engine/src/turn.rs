use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Point;

/// Column letters for human-readable coordinates. The 24-letter alphabet
/// skips I so columns are not mistaken for the digit 1.
pub const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVXYZ";

/// A move: either a stone placed at a point, or a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Play(Point),
    Pass,
}

impl Move {
    pub fn is_play(&self) -> bool {
        matches!(self, Move::Play(_))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            Move::Play(p) => Some(*p),
            Move::Pass => None,
        }
    }
}

impl fmt::Display for Move {
    /// Coordinate notation: column letter plus 1-indexed row, e.g. `(2, 3)`
    /// renders as "B3". A pass renders as "PASS".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => write!(f, "PASS"),
            Move::Play((x, y)) => {
                let letter = COLUMN_LETTERS.as_bytes()[*x as usize - 1] as char;
                write!(f, "{letter}{y}")
            }
        }
    }
}

impl std::str::FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "PASS" {
            return Ok(Move::Pass);
        }
        let mut chars = s.chars();
        let column = chars.next().ok_or_else(|| "empty move string".to_string())?;
        let x = COLUMN_LETTERS
            .find(column)
            .ok_or_else(|| format!("invalid column in move: {s}"))? as u8
            + 1;
        let y: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| format!("invalid row in move: {s}"))?;
        if y == 0 {
            return Err(format!("invalid row in move: {s}"));
        }
        Ok(Move::Play((x, y)))
    }
}

/// One history entry: the move played and the stones it captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub mv: Move,
    pub captured: Vec<Point>,
}
