use thiserror::Error;

use crate::types::{Move, Player};

/// Recoverable errors reported by the engine.
///
/// Precondition failures (playing on an occupied point, asking for the
/// winner of an unfinished game) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoError {
    #[error("illegal move for {player}: {mv}")]
    IllegalMove { player: Player, mv: Move },

    #[error("search selected no move (was it configured with zero rounds?)")]
    NoMoveSelected,

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("unsupported board size: {0}")]
    UnsupportedBoardSize(usize),

    #[error("unknown encoder: {0}")]
    UnknownEncoder(String),
}
