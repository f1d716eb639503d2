//! Game state: board snapshot, player to move and move history.
//!
//! A [`GameState`] is immutable. Applying a move produces a new state that
//! holds a shared reference to the one it came from, so a game is a chain of
//! snapshots. Each state also carries the set of `(player to move, hash)`
//! situations seen before it, extended by one entry per move, which is what
//! the positional superko check looks up.

use std::collections::HashSet;
use std::rc::Rc;

use crate::board::Board;
use crate::scoring::compute_game_result;
use crate::types::{Move, Player, Point};

/// A `(player to move, board hash)` pair.
pub type Situation = (Player, u64);

#[derive(Debug)]
pub struct GameState {
    board: Board,
    next_player: Player,
    previous: Option<Rc<GameState>>,
    last_move: Option<Move>,
    previous_states: HashSet<Situation>,
}

impl GameState {
    fn from_parts(board: Board, next_player: Player, previous: Option<Rc<GameState>>, mv: Option<Move>) -> Self {
        let previous_states = match &previous {
            None => HashSet::new(),
            Some(prev) => {
                let mut seen = prev.previous_states.clone();
                seen.insert(prev.situation());
                seen
            }
        };
        Self {
            board,
            next_player,
            previous,
            last_move: mv,
            previous_states,
        }
    }

    /// An empty `size`x`size` board with Black to move.
    pub fn new_game(size: usize) -> Rc<Self> {
        Rc::new(Self::from_parts(Board::new(size), Player::Black, None, None))
    }

    /// The state after the player to move plays `mv`.
    ///
    /// No legality check is made here; see [`GameState::is_valid_move`].
    pub fn apply_move(self: &Rc<Self>, mv: Move) -> Rc<Self> {
        let next_board = match mv {
            Move::Play(point) => {
                let mut board = self.board.clone();
                board.place_stone(self.next_player, point);
                board
            }
            Move::Pass | Move::Resign => self.board.clone(),
        };
        Rc::new(Self::from_parts(
            next_board,
            self.next_player.other(),
            Some(Rc::clone(self)),
            Some(mv),
        ))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn previous(&self) -> Option<&Rc<GameState>> {
        self.previous.as_ref()
    }

    /// The player to move together with the current board hash.
    pub fn situation(&self) -> Situation {
        (self.next_player, self.board.zobrist_hash())
    }

    /// Situations that occurred before this state.
    pub fn previous_states(&self) -> &HashSet<Situation> {
        &self.previous_states
    }

    /// The game ends on a resignation or on two passes in a row.
    pub fn is_over(&self) -> bool {
        match self.last_move {
            None => false,
            Some(Move::Resign) => true,
            Some(Move::Play(_)) => false,
            Some(Move::Pass) => {
                let second_last = self.previous.as_ref().and_then(|prev| prev.last_move);
                matches!(second_last, Some(Move::Pass))
            }
        }
    }

    fn board_after(&self, player: Player, point: Point) -> Board {
        let mut board = self.board.clone();
        board.place_stone(player, point);
        board
    }

    fn is_self_capture_on(board: &Board, point: Point) -> bool {
        board.get_group(point).is_some_and(|g| g.num_liberties() == 0)
    }

    fn violates_ko_on(&self, board: &Board, player: Player) -> bool {
        self.previous_states
            .contains(&(player.other(), board.zobrist_hash()))
    }

    /// Whether `player` playing `mv` would leave its own group without
    /// liberties. Passes and resignations never do.
    pub fn is_move_self_capture(&self, player: Player, mv: Move) -> bool {
        match mv {
            Move::Play(point) => Self::is_self_capture_on(&self.board_after(player, point), point),
            Move::Pass | Move::Resign => false,
        }
    }

    /// Whether `player` playing `mv` would recreate a situation that already
    /// occurred in this game (positional superko).
    pub fn does_move_violate_ko(&self, player: Player, mv: Move) -> bool {
        match mv {
            Move::Play(point) => self.violates_ko_on(&self.board_after(player, point), player),
            Move::Pass | Move::Resign => false,
        }
    }

    /// Whether the player to move may play `mv` now.
    pub fn is_valid_move(&self, mv: Move) -> bool {
        if self.is_over() {
            return false;
        }
        match mv {
            Move::Pass | Move::Resign => true,
            Move::Play(point) => {
                if !self.board.is_on_grid(point) || self.board.get(point).is_some() {
                    return false;
                }
                let next = self.board_after(self.next_player, point);
                !Self::is_self_capture_on(&next, point) && !self.violates_ko_on(&next, self.next_player)
            }
        }
    }

    /// Every valid play in row-major order, followed by pass and resign.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .board
            .points()
            .map(Move::Play)
            .filter(|&mv| self.is_valid_move(mv))
            .collect();
        moves.push(Move::Pass);
        moves.push(Move::Resign);
        moves
    }

    /// The winner of a finished game.
    ///
    /// Panics if the game is not over.
    pub fn winner(&self) -> Player {
        assert!(self.is_over(), "winner() called before the game is over");
        if self.last_move == Some(Move::Resign) {
            // The resigning player just moved, so the one to move wins.
            return self.next_player;
        }
        compute_game_result(self).winner()
    }

    /// Moves played from the start of the game up to this state.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut state = Some(self);
        while let Some(s) = state {
            if let Some(mv) = s.last_move {
                moves.push(mv);
            }
            state = s.previous.as_deref();
        }
        moves.reverse();
        moves
    }
}

impl Drop for GameState {
    // Unlink the chain iteratively so that long games don't overflow the
    // stack when the last reference goes away.
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(state) = previous {
            match Rc::try_unwrap(state) {
                Ok(mut inner) => previous = inner.previous.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(s: &str) -> Move {
        Move::parse(s).unwrap()
    }

    fn apply_all(state: &Rc<GameState>, moves: &[&str]) -> Rc<GameState> {
        moves.iter().fold(Rc::clone(state), |g, m| g.apply_move(play(m)))
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new_game(9);
        assert_eq!(game.next_player(), Player::Black);
        assert!(game.previous_states().is_empty());
        assert!(game.last_move().is_none());
        assert!(!game.is_over());
    }

    #[test]
    fn test_apply_move_flips_player() {
        let game = GameState::new_game(9);
        let next = game.apply_move(play("E5"));
        assert_eq!(next.next_player(), Player::White);
        assert_eq!(next.board().get(Point::new(5, 5)), Some(Player::Black));
        // The parent board is untouched.
        assert_eq!(game.board().get(Point::new(5, 5)), None);
        assert!(next.previous_states().contains(&game.situation()));
    }

    #[test]
    fn test_pass_keeps_board() {
        let game = apply_all(&GameState::new_game(9), &["E5"]);
        let passed = game.apply_move(Move::Pass);
        assert_eq!(passed.board().zobrist_hash(), game.board().zobrist_hash());
        assert_eq!(passed.next_player(), Player::Black);
    }

    #[test]
    fn test_is_over_sequences() {
        let start = GameState::new_game(9);
        assert!(apply_all(&start, &["E5", "pass", "pass"]).is_over());
        assert!(!apply_all(&start, &["pass", "E5", "pass"]).is_over());
        assert!(apply_all(&start, &["resign"]).is_over());
        assert!(!apply_all(&start, &["pass"]).is_over());
    }

    #[test]
    fn test_self_capture_detected() {
        // White stones at A2 and B1 make A1 a suicide point for Black.
        let game = apply_all(&GameState::new_game(9), &["E5", "A2", "E6", "B1"]);
        assert_eq!(game.next_player(), Player::Black);
        let a1 = play("A1");
        assert!(game.is_move_self_capture(Player::Black, a1));
        assert!(!game.is_valid_move(a1));
        assert!(!game.legal_moves().contains(&a1));
    }

    #[test]
    fn test_capture_is_not_self_capture() {
        // Black A1 takes the last liberty of White's B1 stone.
        let game = apply_all(&GameState::new_game(9), &["A2", "B1", "C1", "E5", "B2", "E6"]);
        let a1 = play("A1");
        assert_eq!(game.board().get_group(play("B1").point().unwrap()).unwrap().num_liberties(), 1);
        assert!(!game.is_move_self_capture(Player::Black, a1));
        assert!(game.is_valid_move(a1));
    }

    #[test]
    fn test_legal_moves_ends_with_pass_and_resign() {
        let game = GameState::new_game(3);
        let moves = game.legal_moves();
        assert_eq!(moves.len(), 11);
        assert_eq!(moves[0], Move::Play(Point::new(1, 1)));
        assert_eq!(moves[9], Move::Pass);
        assert_eq!(moves[10], Move::Resign);
    }

    #[test]
    fn test_no_plays_after_game_over() {
        let game = apply_all(&GameState::new_game(3), &["pass", "pass"]);
        assert_eq!(game.legal_moves(), vec![Move::Pass, Move::Resign]);
        assert!(!game.is_valid_move(Move::Pass));
    }

    #[test]
    fn test_winner_by_resignation() {
        let game = apply_all(&GameState::new_game(9), &["E5", "resign"]);
        assert_eq!(game.winner(), Player::Black);
        let game = apply_all(&GameState::new_game(9), &["resign"]);
        assert_eq!(game.winner(), Player::White);
    }

    #[test]
    fn test_winner_on_empty_board_is_white() {
        let game = apply_all(&GameState::new_game(5), &["pass", "pass"]);
        assert_eq!(game.winner(), Player::White);
    }

    #[test]
    #[should_panic(expected = "before the game is over")]
    fn test_winner_before_end_panics() {
        GameState::new_game(9).winner();
    }

    #[test]
    fn test_moves_history() {
        let game = apply_all(&GameState::new_game(9), &["E5", "pass", "C3"]);
        assert_eq!(game.moves(), vec![play("E5"), Move::Pass, play("C3")]);
    }

    #[test]
    fn test_long_chain_drops() {
        let mut game = GameState::new_game(3);
        for _ in 0..100_000 {
            game = game.apply_move(Move::Pass);
        }
        drop(game);
    }
}
