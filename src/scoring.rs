//! Area scoring.
//!
//! Stones count for their owner and every empty region bordered by a single
//! color counts as that color's territory. Regions touching both colors (or
//! none) are dame. No attempt is made to find dead stones: a stone that is
//! hopelessly surrounded still counts as alive.

use std::collections::HashMap;
use std::fmt;

use crate::board::Board;
use crate::constants::KOMI;
use crate::game::GameState;
use crate::types::{Player, Point};

/// How a single point was classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointStatus {
    Stone(Player),
    Territory(Player),
    Dame,
}

/// The classification of a whole board.
#[derive(Clone, Debug, Default)]
pub struct Territory {
    pub num_black_territory: usize,
    pub num_white_territory: usize,
    pub num_black_stones: usize,
    pub num_white_stones: usize,
    pub num_dame: usize,
    /// Dame points in row-major order.
    pub dame_points: Vec<Point>,
    pub status: HashMap<Point, PointStatus>,
}

impl Territory {
    fn record(&mut self, point: Point, status: PointStatus) {
        match status {
            PointStatus::Stone(Player::Black) => self.num_black_stones += 1,
            PointStatus::Stone(Player::White) => self.num_white_stones += 1,
            PointStatus::Territory(Player::Black) => self.num_black_territory += 1,
            PointStatus::Territory(Player::White) => self.num_white_territory += 1,
            PointStatus::Dame => {
                self.num_dame += 1;
                self.dame_points.push(point);
            }
        }
        self.status.insert(point, status);
    }

    pub fn get(&self, point: Point) -> Option<PointStatus> {
        self.status.get(&point).copied()
    }
}

/// Classify every point of the board as stone, territory or dame.
pub fn evaluate_territory(board: &Board) -> Territory {
    let mut territory = Territory::default();

    for point in board.points() {
        if territory.status.contains_key(&point) {
            continue;
        }
        if let Some(color) = board.get(point) {
            territory.record(point, PointStatus::Stone(color));
            continue;
        }

        let (region, borders) = collect_region(point, board);
        let fill = match borders.as_slice() {
            [owner] => PointStatus::Territory(*owner),
            _ => PointStatus::Dame,
        };
        for p in region {
            territory.record(p, fill);
        }
    }

    // Flood fills record dame out of order.
    territory.dame_points.sort();
    territory
}

/// Flood-fill the empty region containing `start`.
///
/// Returns the region's points and the distinct stone colors on its border.
fn collect_region(start: Point, board: &Board) -> (Vec<Point>, Vec<Player>) {
    let mut region = vec![start];
    let mut borders: Vec<Player> = Vec::with_capacity(2);
    let mut stack = vec![start];
    let mut visited = vec![false; board.num_rows * board.num_cols];
    let index = |p: Point| (p.row - 1) * board.num_cols + (p.col - 1);
    visited[index(start)] = true;

    while let Some(point) = stack.pop() {
        for neighbor in board.neighbors(point) {
            match board.get(neighbor) {
                Some(color) => {
                    if !borders.contains(&color) {
                        borders.push(color);
                    }
                }
                None => {
                    let i = index(neighbor);
                    if !visited[i] {
                        visited[i] = true;
                        region.push(neighbor);
                        stack.push(neighbor);
                    }
                }
            }
        }
    }

    (region, borders)
}

/// Final score of a game.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameResult {
    /// Black stones plus black territory.
    pub black: f64,
    /// White stones plus white territory, without komi.
    pub white: f64,
    pub komi: f64,
}

impl GameResult {
    /// Black wins only with a strictly higher score; ties go to White.
    pub fn winner(&self) -> Player {
        if self.black > self.white + self.komi {
            Player::Black
        } else {
            Player::White
        }
    }

    pub fn winning_margin(&self) -> f64 {
        (self.black - (self.white + self.komi)).abs()
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let white = self.white + self.komi;
        if self.black > white {
            write!(f, "B+{:.1}", self.black - white)
        } else {
            write!(f, "W+{:.1}", white - self.black)
        }
    }
}

/// Score a board with the given komi.
pub fn score_board(board: &Board, komi: f64) -> GameResult {
    let territory = evaluate_territory(board);
    GameResult {
        black: (territory.num_black_territory + territory.num_black_stones) as f64,
        white: (territory.num_white_territory + territory.num_white_stones) as f64,
        komi,
    }
}

/// Score the current position of a game with the standard komi.
pub fn compute_game_result(game_state: &GameState) -> GameResult {
    score_board(game_state.board(), KOMI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_all_dame() {
        let board = Board::new(5);
        let territory = evaluate_territory(&board);
        assert_eq!(territory.num_dame, 25);
        assert_eq!(territory.dame_points.len(), 25);
        assert_eq!(territory.dame_points[0], Point::new(1, 1));
        assert_eq!(territory.num_black_territory, 0);
        assert_eq!(territory.num_white_territory, 0);
    }

    #[test]
    fn test_single_stone_owns_board() {
        let mut board = Board::new(5);
        board.place_stone(Player::White, Point::new(3, 3));
        let territory = evaluate_territory(&board);
        assert_eq!(territory.num_white_stones, 1);
        assert_eq!(territory.num_white_territory, 24);
        assert_eq!(territory.get(Point::new(1, 1)), Some(PointStatus::Territory(Player::White)));
    }

    #[test]
    fn test_each_point_classified_once() {
        let mut board = Board::new(7);
        board.place_stone(Player::Black, Point::new(2, 2));
        board.place_stone(Player::White, Point::new(6, 6));
        board.place_stone(Player::Black, Point::new(4, 1));
        let t = evaluate_territory(&board);
        let total = t.num_black_stones
            + t.num_white_stones
            + t.num_black_territory
            + t.num_white_territory
            + t.num_dame;
        assert_eq!(total, 49);
        assert_eq!(t.status.len(), 49);
    }

    #[test]
    fn test_result_winner_and_margin() {
        let result = GameResult { black: 40.0, white: 30.0, komi: 7.5 };
        assert_eq!(result.winner(), Player::Black);
        assert_eq!(result.winning_margin(), 2.5);
        assert_eq!(result.to_string(), "B+2.5");

        let result = GameResult { black: 35.0, white: 30.0, komi: 7.5 };
        assert_eq!(result.winner(), Player::White);
        assert_eq!(result.to_string(), "W+2.5");
    }

    #[test]
    fn test_tie_goes_to_white() {
        let result = GameResult { black: 30.0, white: 30.0, komi: 0.0 };
        assert_eq!(result.winner(), Player::White);
        assert_eq!(result.winning_margin(), 0.0);
    }
}
