//! Move-selecting agents and the harness that plays them against each other.
//!
//! An [`Agent`] proposes a move for the player to move. The harness never
//! trusts that proposal: [`check_move`] reports anything outside the legal
//! move list as [`GoError::IllegalMove`] before the move is applied.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::board::Board;
use crate::error::GoError;
use crate::game::GameState;
use crate::types::{Move, Player, Point};

/// Something that can choose a move.
pub trait Agent {
    /// Pick a move for `game_state.next_player()`.
    fn select_move(&mut self, game_state: &Rc<GameState>) -> Result<Move, GoError>;
}

/// Whether `point` is an eye of `color`.
///
/// All on-grid orthogonal neighbours must be `color`. In the middle of the
/// board at least three of the four diagonals must be friendly as well; on
/// the edge or in a corner every on-grid diagonal must be.
pub fn is_point_an_eye(board: &Board, point: Point, color: Player) -> bool {
    if board.get(point).is_some() {
        return false;
    }
    if board.neighbors(point).any(|n| board.get(n) != Some(color)) {
        return false;
    }

    let mut friendly_corners = 0;
    let mut off_board_corners = 0;
    for corner in point.corners() {
        if !board.is_on_grid(corner) {
            off_board_corners += 1;
        } else if board.get(corner) == Some(color) {
            friendly_corners += 1;
        }
    }

    if off_board_corners > 0 {
        off_board_corners + friendly_corners == 4
    } else {
        friendly_corners >= 3
    }
}

/// Plays uniformly at random among valid moves that don't fill one of its
/// own eyes. Passes when nothing is left; never resigns.
pub struct RandomBot {
    rng: fastrand::Rng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    pub fn with_rng(rng: fastrand::Rng) -> Self {
        Self { rng }
    }

    /// Choose a move using the caller's RNG.
    pub fn choose(rng: &mut fastrand::Rng, game_state: &GameState) -> Move {
        let board = game_state.board();
        let player = game_state.next_player();
        let candidates: Vec<Point> = board
            .points()
            .filter(|&p| game_state.is_valid_move(Move::Play(p)) && !is_point_an_eye(board, p, player))
            .collect();
        if candidates.is_empty() {
            return Move::Pass;
        }
        Move::Play(candidates[rng.usize(..candidates.len())])
    }
}

impl Agent for RandomBot {
    fn select_move(&mut self, game_state: &Rc<GameState>) -> Result<Move, GoError> {
        Ok(Self::choose(&mut self.rng, game_state))
    }
}

/// Report whether `mv` is in `game_state.legal_moves()`.
///
/// Pass and resign are always legal; a play must be a valid move.
pub fn check_move(game_state: &GameState, mv: Move) -> Result<(), GoError> {
    let legal = match mv {
        Move::Pass | Move::Resign => true,
        Move::Play(_) => game_state.is_valid_move(mv),
    };
    if legal {
        Ok(())
    } else {
        let player = game_state.next_player();
        warn!(%player, %mv, "agent proposed an illegal move");
        Err(GoError::IllegalMove { player, mv })
    }
}

/// A finished (or truncated) game.
#[derive(Debug)]
pub struct GameRecord {
    pub moves: Vec<(Player, Move)>,
    pub final_state: Rc<GameState>,
    /// `None` when the move limit stopped the game before it ended.
    pub winner: Option<Player>,
}

/// Play a game between two agents.
///
/// `observer` is called after every move with the player who moved, the move
/// and the resulting state.
pub fn play_game(
    black: &mut dyn Agent,
    white: &mut dyn Agent,
    board_size: usize,
    max_moves: usize,
    mut observer: impl FnMut(Player, Move, &GameState),
) -> Result<GameRecord, GoError> {
    let board_size = Board::check_size(board_size)?;
    let mut game = GameState::new_game(board_size);
    let mut moves = Vec::new();

    while !game.is_over() && moves.len() < max_moves {
        let player = game.next_player();
        let mv = match player {
            Player::Black => black.select_move(&game)?,
            Player::White => white.select_move(&game)?,
        };
        check_move(&game, mv)?;
        game = game.apply_move(mv);
        moves.push((player, mv));
        observer(player, mv, &game);
    }

    let winner = game.is_over().then(|| game.winner());
    debug!(moves = moves.len(), ?winner, "game finished");
    Ok(GameRecord {
        moves,
        final_state: game,
        winner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Point {
        Point::parse(s).unwrap()
    }

    struct Scripted(Vec<Move>);

    impl Agent for Scripted {
        fn select_move(&mut self, _: &Rc<GameState>) -> Result<Move, GoError> {
            Ok(self.0.remove(0))
        }
    }

    #[test]
    fn test_corner_eye() {
        let mut board = Board::new(5);
        board.place_stone(Player::Black, p("A2"));
        board.place_stone(Player::Black, p("B1"));
        assert!(!is_point_an_eye(&board, p("A1"), Player::Black));
        board.place_stone(Player::Black, p("B2"));
        assert!(is_point_an_eye(&board, p("A1"), Player::Black));
        assert!(!is_point_an_eye(&board, p("A1"), Player::White));
    }

    #[test]
    fn test_center_eye_needs_three_corners() {
        let mut board = Board::new(5);
        for s in ["C2", "B3", "D3", "C4", "B2", "D2"] {
            board.place_stone(Player::Black, p(s));
        }
        assert!(!is_point_an_eye(&board, p("C3"), Player::Black));
        board.place_stone(Player::Black, p("B4"));
        assert!(is_point_an_eye(&board, p("C3"), Player::Black));
    }

    #[test]
    fn test_edge_eye_needs_every_diagonal() {
        let mut board = Board::new(5);
        for s in ["A2", "A4", "B3", "B2"] {
            board.place_stone(Player::Black, p(s));
        }
        board.place_stone(Player::White, p("B4"));
        assert!(!is_point_an_eye(&board, p("A3"), Player::Black));
    }

    #[test]
    fn test_random_bot_is_deterministic() {
        let game = GameState::new_game(9);
        let mut a = RandomBot::new(7);
        let mut b = RandomBot::new(7);
        for _ in 0..5 {
            assert_eq!(a.select_move(&game).unwrap(), b.select_move(&game).unwrap());
        }
    }

    #[test]
    fn test_random_bot_passes_when_only_eyes_remain() {
        // Black fills a 2x2 board except for B1.
        let mut game = GameState::new_game(2);
        for mv in ["A1", "pass", "B2", "pass", "A2", "pass"] {
            game = game.apply_move(Move::parse(mv).unwrap());
        }
        assert_eq!(game.next_player(), Player::Black);
        assert!(is_point_an_eye(game.board(), p("B1"), Player::Black));
        assert_eq!(RandomBot::new(1).select_move(&game).unwrap(), Move::Pass);
    }

    #[test]
    fn test_check_move_rejects_occupied_point() {
        let game = GameState::new_game(9).apply_move(Move::Play(p("E5")));
        let err = check_move(&game, Move::Play(p("E5"))).unwrap_err();
        assert_eq!(err, GoError::IllegalMove { player: Player::White, mv: Move::Play(p("E5")) });
        assert!(check_move(&game, Move::Pass).is_ok());
        assert!(check_move(&game, Move::Resign).is_ok());
    }

    #[test]
    fn test_play_game_reports_illegal_move() {
        let mut black = Scripted(vec![Move::Play(p("C3")), Move::Pass]);
        let mut white = Scripted(vec![Move::Play(p("C3"))]);
        let err = play_game(&mut black, &mut white, 5, 10, |_, _, _| {}).unwrap_err();
        assert!(matches!(err, GoError::IllegalMove { player: Player::White, .. }));
    }

    #[test]
    fn test_play_game_random_bots_finish() {
        let mut black = RandomBot::new(1);
        let mut white = RandomBot::new(2);
        let mut seen = 0;
        let record = play_game(&mut black, &mut white, 5, 2000, |_, _, _| seen += 1).unwrap();
        assert_eq!(seen, record.moves.len());
        assert!(record.final_state.is_over());
        assert!(record.winner.is_some());
        assert!(record.moves.iter().all(|(_, mv)| !mv.is_resign()));
    }

    #[test]
    fn test_play_game_stops_at_move_limit() {
        let mut black = RandomBot::new(3);
        let mut white = RandomBot::new(4);
        let record = play_game(&mut black, &mut white, 9, 4, |_, _, _| {}).unwrap();
        assert_eq!(record.moves.len(), 4);
        assert_eq!(record.winner, None);
    }

    #[test]
    fn test_play_game_rejects_bad_size() {
        let mut black = RandomBot::new(3);
        let mut white = RandomBot::new(4);
        let err = play_game(&mut black, &mut white, 25, 4, |_, _, _| {}).unwrap_err();
        assert_eq!(err, GoError::UnsupportedBoardSize(25));
    }
}
