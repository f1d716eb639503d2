//! Basic value types: players, board points and moves.
//!
//! Points are 1-indexed `(row, col)` pairs. Row 1 is the bottom edge as seen
//! by a human and column 1 is `A`; the text form follows the usual Go
//! convention of column letters `A`-`T` without `I`, then the row number.

use std::fmt;
use std::str::FromStr;

use crate::constants::COLS;
use crate::error::GoError;

/// One of the two players. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The opponent.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Index for per-color tables (`0` black, `1` white).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// A board intersection, 1-indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbours: up, down, left, right.
    ///
    /// Neighbours of edge points fall off the grid (row or column `0`, or
    /// wrapped to `usize::MAX`); callers filter with `Board::is_on_grid`.
    #[inline]
    pub fn neighbors(self) -> [Point; 4] {
        [
            Point::new(self.row.wrapping_sub(1), self.col),
            Point::new(self.row + 1, self.col),
            Point::new(self.row, self.col.wrapping_sub(1)),
            Point::new(self.row, self.col + 1),
        ]
    }

    /// The four diagonal neighbours.
    #[inline]
    pub fn corners(self) -> [Point; 4] {
        let up = self.row.wrapping_sub(1);
        let left = self.col.wrapping_sub(1);
        [
            Point::new(up, left),
            Point::new(up, self.col + 1),
            Point::new(self.row + 1, left),
            Point::new(self.row + 1, self.col + 1),
        ]
    }

    /// Parse a vertex such as `"D4"` or `"q16"`.
    ///
    /// Only the coordinate convention is checked here; whether the point fits
    /// on a particular board is up to the caller.
    pub fn parse(s: &str) -> Result<Self, GoError> {
        let s = s.trim();
        let invalid = || GoError::InvalidCoordinate(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let col = COLS.find(letter).ok_or_else(invalid)? + 1;
        let row: usize = chars.as_str().parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Point::new(row, col))
    }
}

impl FromStr for Point {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Point::parse(s)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.col.checked_sub(1).and_then(|c| COLS.chars().nth(c)) {
            Some(letter) => write!(f, "{letter}{}", self.row),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

/// A turn action. Exactly one of play, pass or resign.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Play(Point),
    Pass,
    Resign,
}

impl Move {
    #[inline]
    pub fn is_resign(&self) -> bool {
        matches!(self, Move::Resign)
    }

    /// The point played, if this is a play.
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            Move::Play(p) => Some(*p),
            _ => None,
        }
    }

    /// Parse `"pass"`, `"resign"` or a vertex.
    pub fn parse(s: &str) -> Result<Self, GoError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else if s.eq_ignore_ascii_case("resign") {
            Ok(Move::Resign)
        } else {
            Point::parse(s).map(Move::Play)
        }
    }
}

impl FromStr for Move {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play(p) => write!(f, "{p}"),
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_other() {
        assert_eq!(Player::Black.other(), Player::White);
        assert_eq!(Player::White.other(), Player::Black);
    }

    #[test]
    fn test_neighbors() {
        let n = Point::new(3, 3).neighbors();
        assert!(n.contains(&Point::new(2, 3)));
        assert!(n.contains(&Point::new(4, 3)));
        assert!(n.contains(&Point::new(3, 2)));
        assert!(n.contains(&Point::new(3, 4)));
    }

    #[test]
    fn test_parse_skips_i() {
        assert_eq!(Point::parse("H5").unwrap(), Point::new(5, 8));
        assert_eq!(Point::parse("J5").unwrap(), Point::new(5, 9));
        assert!(Point::parse("I5").is_err());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Point::parse("d4").unwrap(), Point::new(4, 4));
        assert_eq!(Point::parse("T19").unwrap(), Point::new(19, 19));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Point::parse("").is_err());
        assert!(Point::parse("A").is_err());
        assert!(Point::parse("A0").is_err());
        assert!(Point::parse("Z3").is_err());
        assert!(Point::parse("4D").is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for row in 1..=19 {
            for col in 1..=19 {
                let p = Point::new(row, col);
                assert_eq!(Point::parse(&p.to_string()).unwrap(), p);
            }
        }
    }

    #[test]
    fn test_move_parse() {
        assert_eq!(Move::parse("pass").unwrap(), Move::Pass);
        assert_eq!(Move::parse("RESIGN").unwrap(), Move::Resign);
        assert_eq!(Move::parse("C3").unwrap(), Move::Play(Point::new(3, 3)));
        assert_eq!(Move::Play(Point::new(1, 1)).to_string(), "A1");
    }
}
