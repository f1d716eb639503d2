//! Zobrist hashing for positional superko detection.
//!
//! Every (point, color) pair gets a random 63-bit code. A board's hash is the
//! XOR of the codes of all its stones with a fixed empty-board value, so it
//! can be updated in O(1) when a stone is added or removed and two boards
//! with the same stones hash identically whatever order they were played in.

use std::sync::LazyLock;

use crate::constants::{MAX63, MAX_BOARD_SIZE, ZOBRIST_SEED};
use crate::types::{Player, Point};

/// Pre-computed random codes.
pub struct ZobristTable {
    /// Indexed by `[(row - 1) * MAX_BOARD_SIZE + (col - 1)][player]`.
    codes: Vec<[u64; 2]>,
    /// Hash of the empty board.
    empty_board: u64,
}

impl ZobristTable {
    fn new() -> Self {
        // Deterministic seed so that hashes are reproducible between runs.
        let mut rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
        let codes = (0..MAX_BOARD_SIZE * MAX_BOARD_SIZE)
            .map(|_| [rng.u64(1..=MAX63), rng.u64(1..=MAX63)])
            .collect();
        let empty_board = rng.u64(0..=MAX63);
        Self { codes, empty_board }
    }
}

/// Global table, built on first use.
pub static ZOBRIST: LazyLock<ZobristTable> = LazyLock::new(ZobristTable::new);

/// Code for a stone of `player` at `point`.
///
/// Panics if the point is outside a 19x19 grid.
#[inline]
pub fn hash_code(point: Point, player: Player) -> u64 {
    debug_assert!((1..=MAX_BOARD_SIZE).contains(&point.row));
    debug_assert!((1..=MAX_BOARD_SIZE).contains(&point.col));
    ZOBRIST.codes[(point.row - 1) * MAX_BOARD_SIZE + (point.col - 1)][player.index()]
}

/// Hash of a board with no stones.
#[inline]
pub fn empty_board() -> u64 {
    ZOBRIST.empty_board
}
