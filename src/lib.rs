//! Goban-MCTS: a Go board engine with a Monte Carlo Tree Search player.
//!
//! The board tracks connected groups and their liberties incrementally,
//! handles captures, and keeps a Zobrist hash of the position so that the
//! positional superko rule can be checked cheaply. Game states form an
//! immutable chain; the MCTS agent searches over them using random playouts.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, komi and search defaults
//! - [`types`] - Players, points, moves and coordinate notation
//! - [`zobrist`] - Position hash codes
//! - [`board`] - Stones, groups, liberties and captures
//! - [`game`] - Game states, legality, ko and game end
//! - [`scoring`] - Territory evaluation and final result
//! - [`agent`] - Agent trait, random bot and game harness
//! - [`mcts`] - Monte Carlo Tree Search agent
//! - [`encoders`] - Board encoders and self-play training samples
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use goban_mcts::agent::Agent;
//! use goban_mcts::game::GameState;
//! use goban_mcts::mcts::{MctsAgent, MctsConfig};
//! use goban_mcts::types::Move;
//!
//! // Create a new game and play a move
//! let game = GameState::new_game(5);
//! let game = game.apply_move(Move::parse("C3").unwrap());
//!
//! // Run MCTS to find the reply
//! let mut bot = MctsAgent::new(MctsConfig { rounds: 20, ..MctsConfig::default() });
//! let reply = bot.select_move(&game).unwrap();
//! assert!(game.legal_moves().contains(&reply));
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod encoders;
pub mod error;
pub mod game;
pub mod gtp;
pub mod mcts;
pub mod scoring;
pub mod types;
pub mod zobrist;

pub use error::GoError;
