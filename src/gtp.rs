//! Go Text Protocol (GTP) front end.
//!
//! Implements enough of GTP version 2 to use the engine from graphical
//! clients such as Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Any size from 1 to 19; clears the board
//! - `clear_board`
//! - `komi <value>` - Only the built-in komi is accepted
//! - `play <color> <vertex>` - Illegal moves are rejected, not applied
//! - `genmove <color>` - Search and play a move
//!
//! `play` and `genmove` accept either color. If the other color is on move
//! it is made to pass first, unless that pass would end the game.
//! - `showboard`
//! - `final_score`
//!
//! ## Example
//!
//! ```ignore
//! use goban_mcts::gtp::GtpEngine;
//! use goban_mcts::mcts::MctsConfig;
//! let mut engine = GtpEngine::new(MctsConfig::default());
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tracing::debug;

use crate::agent::{check_move, Agent};
use crate::board::Board;
use crate::constants::{DEFAULT_BOARD_SIZE, KOMI};
use crate::error::GoError;
use crate::game::GameState;
use crate::mcts::{MctsAgent, MctsConfig};
use crate::scoring::compute_game_result;
use crate::types::{Move, Player};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    game: Rc<GameState>,
    board_size: usize,
    agent: MctsAgent,
}

impl GtpEngine {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            game: GameState::new_game(DEFAULT_BOARD_SIZE),
            board_size: DEFAULT_BOARD_SIZE,
            agent: MctsAgent::new(config),
        }
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(stdout, "{prefix}{id_str} {message}\n\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(arg: &str) -> Option<Player> {
        match arg.to_lowercase().as_str() {
            "b" | "black" => Some(Player::Black),
            "w" | "white" => Some(Player::White),
            _ => None,
        }
    }

    /// The state in which `arg` is to move.
    ///
    /// When the other color is on move, it passes first. That pass is refused
    /// if it would end the game.
    fn state_for_color(&self, arg: &str) -> Result<Rc<GameState>, String> {
        let color = Self::parse_color(arg).ok_or_else(|| format!("invalid color: {arg}"))?;
        if color == self.game.next_player() {
            return Ok(Rc::clone(&self.game));
        }
        let passed = self.game.apply_move(Move::Pass);
        if passed.is_over() {
            return Err(format!("{} is to play", self.game.next_player()));
        }
        Ok(passed)
    }

    fn parse_vertex(&self, arg: &str) -> Result<Move, GoError> {
        let mv = Move::parse(arg)?;
        match mv.point() {
            Some(p) if !self.game.board().is_on_grid(p) => {
                Err(GoError::InvalidCoordinate(arg.to_string()))
            }
            _ => Ok(mv),
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        debug!(command, ?args, "gtp");
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let size = match args[0].parse::<usize>() {
                    Ok(size) => size,
                    Err(_) => return (false, "invalid size".to_string()),
                };
                match Board::check_size(size) {
                    Ok(size) => {
                        self.board_size = size;
                        self.game = GameState::new_game(size);
                        (true, String::new())
                    }
                    Err(_) => (false, "unacceptable size".to_string()),
                }
            }

            "clear_board" => {
                self.game = GameState::new_game(self.board_size);
                (true, String::new())
            }

            "komi" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<f64>() {
                    Ok(komi) if komi == KOMI => (true, String::new()),
                    Ok(_) => (false, format!("only komi {KOMI} is supported")),
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let state = match self.state_for_color(args[0]) {
                    Ok(state) => state,
                    Err(e) => return (false, e),
                };
                let mv = match self.parse_vertex(args[1]) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                if check_move(&state, mv).is_err() {
                    return (false, "illegal move".to_string());
                }
                self.game = state.apply_move(mv);
                (true, String::new())
            }

            "genmove" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let state = match self.state_for_color(args[0]) {
                    Ok(state) => state,
                    Err(e) => return (false, e),
                };
                match self.agent.select_move(&state) {
                    Ok(mv) => {
                        self.game = state.apply_move(mv);
                        (true, mv.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => {
                let board = self.game.board().to_string();
                (true, format!("\n{}", board.trim_end()))
            }

            "final_score" => (true, compute_game_result(&self.game).to_string()),

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
