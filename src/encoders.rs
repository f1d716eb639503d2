//! Board-to-array encoders for learning models.
//!
//! Encoders are looked up by name from a fixed table; there is no dynamic
//! loading. [`generate_game`] uses them to turn MCTS self-play into
//! `(position, move)` training samples.

use tracing::debug;

use crate::agent::{play_game, GameRecord};
use crate::error::GoError;
use crate::game::GameState;
use crate::mcts::{MctsAgent, MctsConfig};
use crate::types::Point;

/// Turns a game state into a flat `planes x rows x cols` array.
pub trait Encoder {
    fn name(&self) -> &'static str;

    /// Encode the position, plane-major then row-major.
    fn encode(&self, game_state: &GameState) -> Vec<f64>;

    /// Index of a point in one plane.
    fn encode_point(&self, point: Point) -> usize;

    /// Inverse of [`Encoder::encode_point`].
    fn decode_point_index(&self, index: usize) -> Point;

    fn num_points(&self) -> usize;

    /// `(planes, rows, cols)`
    fn shape(&self) -> (usize, usize, usize);
}

/// A single plane: `1` for stones of the player to move, `-1` for the
/// opponent's stones, `0` for empty points.
pub struct OnePlaneEncoder {
    board_size: usize,
}

impl OnePlaneEncoder {
    pub fn new(board_size: usize) -> Self {
        Self { board_size }
    }
}

impl Encoder for OnePlaneEncoder {
    fn name(&self) -> &'static str {
        "oneplane"
    }

    fn encode(&self, game_state: &GameState) -> Vec<f64> {
        let board = game_state.board();
        let me = game_state.next_player();
        let mut out = vec![0.0; self.num_points()];
        for point in board.points() {
            if let Some(color) = board.get(point) {
                out[self.encode_point(point)] = if color == me { 1.0 } else { -1.0 };
            }
        }
        out
    }

    fn encode_point(&self, point: Point) -> usize {
        self.board_size * (point.row - 1) + (point.col - 1)
    }

    fn decode_point_index(&self, index: usize) -> Point {
        Point::new(index / self.board_size + 1, index % self.board_size + 1)
    }

    fn num_points(&self) -> usize {
        self.board_size * self.board_size
    }

    fn shape(&self) -> (usize, usize, usize) {
        (1, self.board_size, self.board_size)
    }
}

/// Build the encoder registered under `name`.
pub fn get_encoder_by_name(name: &str, board_size: usize) -> Option<Box<dyn Encoder>> {
    match name {
        "oneplane" => Some(Box::new(OnePlaneEncoder::new(board_size))),
        _ => None,
    }
}

/// Samples collected from one self-play game.
#[derive(Debug)]
pub struct TrainingGame {
    /// Encoded position before each play, in move order.
    pub boards: Vec<Vec<f64>>,
    /// One-hot target for each entry of `boards`: the point that was played.
    pub moves: Vec<Vec<f64>>,
    /// `(planes, rows, cols)` of every board sample.
    pub shape: (usize, usize, usize),
    pub record: GameRecord,
}

/// Play one MCTS-vs-MCTS game and encode every play with `encoder_name`.
///
/// Passes and resignations produce no sample. White searches with
/// `config.seed + 1` so the two sides don't mirror each other.
pub fn generate_game(
    encoder_name: &str,
    board_size: usize,
    config: &MctsConfig,
    max_moves: usize,
) -> Result<TrainingGame, GoError> {
    let encoder = get_encoder_by_name(encoder_name, board_size)
        .ok_or_else(|| GoError::UnknownEncoder(encoder_name.to_string()))?;
    let mut black = MctsAgent::new(config.clone());
    let mut white = MctsAgent::new(MctsConfig {
        seed: config.seed.wrapping_add(1),
        ..config.clone()
    });

    let mut boards = Vec::new();
    let mut moves = Vec::new();
    let record = play_game(&mut black, &mut white, board_size, max_moves, |_, mv, state| {
        if let (Some(point), Some(before)) = (mv.point(), state.previous()) {
            boards.push(encoder.encode(before));
            let mut target = vec![0.0; encoder.num_points()];
            target[encoder.encode_point(point)] = 1.0;
            moves.push(target);
        }
    })?;

    debug!(samples = boards.len(), moves = record.moves.len(), "training game generated");
    Ok(TrainingGame {
        boards,
        moves,
        shape: encoder.shape(),
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;

    #[test]
    fn test_lookup() {
        let enc = get_encoder_by_name("oneplane", 9).unwrap();
        assert_eq!(enc.name(), "oneplane");
        assert_eq!(enc.shape(), (1, 9, 9));
        assert!(get_encoder_by_name("sevenplane", 9).is_none());
    }

    #[test]
    fn test_point_index_follows_board_order() {
        let enc = OnePlaneEncoder::new(5);
        let board = crate::board::Board::new(5);
        for (i, p) in board.points().enumerate() {
            assert_eq!(enc.encode_point(p), i);
            assert_eq!(enc.decode_point_index(i), p);
        }
    }

    #[test]
    fn test_encode_is_relative_to_player_to_move() {
        let game = GameState::new_game(3)
            .apply_move(Move::Play(Point::new(1, 1)))
            .apply_move(Move::Play(Point::new(3, 3)));
        let enc = OnePlaneEncoder::new(3);
        // Black to move: black stone +1, white stone -1.
        let planes = enc.encode(&game);
        assert_eq!(planes[0], 1.0);
        assert_eq!(planes[8], -1.0);
        assert_eq!(planes.iter().filter(|&&v| v == 0.0).count(), 7);
    }

    fn small_config() -> MctsConfig {
        MctsConfig {
            rounds: 8,
            temperature: 0.8,
            seed: 17,
        }
    }

    #[test]
    fn test_generate_game_one_sample_per_play() {
        let game = generate_game("oneplane", 5, &small_config(), 12).unwrap();
        let plays: Vec<Point> = game.record.moves.iter().filter_map(|(_, mv)| mv.point()).collect();
        assert_eq!(game.boards.len(), plays.len());
        assert_eq!(game.moves.len(), plays.len());
        assert_eq!(game.shape, (1, 5, 5));

        let enc = OnePlaneEncoder::new(5);
        for (target, &point) in game.moves.iter().zip(&plays) {
            assert_eq!(target.len(), 25);
            assert_eq!(target.iter().sum::<f64>(), 1.0);
            assert_eq!(target[enc.encode_point(point)], 1.0);
        }
    }

    #[test]
    fn test_generate_game_encodes_position_before_the_play() {
        let game = generate_game("oneplane", 5, &small_config(), 10).unwrap();
        let enc = OnePlaneEncoder::new(5);

        let mut state = GameState::new_game(5);
        let mut expected = Vec::new();
        for &(_, mv) in &game.record.moves {
            if mv.point().is_some() {
                expected.push(enc.encode(&state));
            }
            state = state.apply_move(mv);
        }
        assert_eq!(game.boards, expected);
    }

    #[test]
    fn test_generate_game_unknown_encoder() {
        let err = generate_game("sevenplane", 5, &small_config(), 4).unwrap_err();
        assert_eq!(err, GoError::UnknownEncoder("sevenplane".to_string()));
    }
}
