//! Constants for board geometry, scoring and search defaults.
//!
//! Board size is a runtime value (any square board up to [`MAX_BOARD_SIZE`]);
//! everything else that tunes the engine lives here.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest supported board. The Zobrist table is sized for it.
pub const MAX_BOARD_SIZE: usize = 19;

/// Board size used when none is given on the command line.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Column letters, left to right. `I` is skipped by convention.
pub const COLS: &str = "ABCDEFGHJKLMNOPQRST";

// =============================================================================
// Scoring
// =============================================================================

/// Compensation added to White's score.
pub const KOMI: f64 = 7.5;

// =============================================================================
// Zobrist Hashing
// =============================================================================

/// Upper bound for hash codes (63 random bits).
pub const MAX63: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// Seed for the hash table, fixed so that hashes are stable across runs.
pub const ZOBRIST_SEED: u64 = 0x5EED_0F_B0A4D;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of search rounds per move.
pub const DEFAULT_ROUNDS: usize = 500;

/// Default UCT exploration temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.8;

/// Default RNG seed for agents.
pub const DEFAULT_SEED: u64 = 42;

/// Default cap on moves in a self-play game.
pub const DEFAULT_MAX_MOVES: usize = 200;

// =============================================================================
// Training Data
// =============================================================================

/// Default number of self-play games for `generate`.
pub const DEFAULT_NUM_GAMES: usize = 10;

/// Default cap on moves per game for `generate`.
pub const DEFAULT_SAMPLE_MAX_MOVES: usize = 60;

/// Encoder used when none is named.
pub const DEFAULT_ENCODER: &str = "oneplane";
