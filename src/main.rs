//! Goban-MCTS command line.
//!
//! ## Usage
//!
//! - `goban-mcts` - Show a demo
//! - `goban-mcts gtp` - Start GTP server for GUI integration
//! - `goban-mcts selfplay` - Watch the MCTS bot play a full game
//! - `goban-mcts generate` - Encode MCTS self-play games as training samples
//! - `goban-mcts demo` - Run the demo
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use goban_mcts::agent::{play_game, Agent, RandomBot};
use goban_mcts::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_ENCODER, DEFAULT_MAX_MOVES, DEFAULT_NUM_GAMES, DEFAULT_ROUNDS,
    DEFAULT_SAMPLE_MAX_MOVES, DEFAULT_SEED, DEFAULT_TEMPERATURE,
};
use goban_mcts::encoders::generate_game;
use goban_mcts::game::GameState;
use goban_mcts::gtp::GtpEngine;
use goban_mcts::mcts::{MctsAgent, MctsConfig};
use goban_mcts::scoring::{compute_game_result, evaluate_territory};
use goban_mcts::types::{Move, Player};

/// Goban-MCTS: a Go engine driven by Monte Carlo Tree Search
#[derive(Parser)]
#[command(name = "goban-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct SearchArgs {
    /// MCTS rounds per move
    #[arg(short, long, default_value_t = DEFAULT_ROUNDS)]
    rounds: usize,
    /// UCT exploration temperature
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,
    /// RNG seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl SearchArgs {
    fn config(&self) -> MctsConfig {
        MctsConfig {
            rounds: self.rounds,
            temperature: self.temperature,
            seed: self.seed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Mcts,
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a bot-vs-bot game with MCTS as Black
    Selfplay {
        #[command(flatten)]
        search: SearchArgs,
        /// Board size (1-19)
        #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
        board_size: usize,
        /// Stop the game after this many moves
        #[arg(short, long, default_value_t = DEFAULT_MAX_MOVES)]
        max_moves: usize,
        /// Who plays White
        #[arg(long, value_enum, default_value_t = Opponent::Mcts)]
        opponent: Opponent,
        /// Only print the final result
        #[arg(short, long)]
        quiet: bool,
    },
    /// Play MCTS self-play games and encode each play as a training sample
    Generate {
        #[command(flatten)]
        search: SearchArgs,
        /// Board size (1-19)
        #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
        board_size: usize,
        /// Stop each game after this many moves
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_MAX_MOVES)]
        max_moves: usize,
        /// Number of games to play
        #[arg(short, long, default_value_t = DEFAULT_NUM_GAMES)]
        num_games: usize,
        /// Encoder name
        #[arg(short, long, default_value = DEFAULT_ENCODER)]
        encoder: String,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { search }) => {
            let mut engine = GtpEngine::new(search.config());
            engine.run().context("GTP session failed")?;
        }
        Some(Commands::Selfplay {
            search,
            board_size,
            max_moves,
            opponent,
            quiet,
        }) => run_selfplay(&search, board_size, max_moves, opponent, quiet)?,
        Some(Commands::Generate {
            search,
            board_size,
            max_moves,
            num_games,
            encoder,
        }) => run_generate(&search, board_size, max_moves, num_games, &encoder)?,
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_selfplay(
    search: &SearchArgs,
    board_size: usize,
    max_moves: usize,
    opponent: Opponent,
    quiet: bool,
) -> Result<()> {
    let mut black = MctsAgent::new(search.config());
    let mut white: Box<dyn Agent> = match opponent {
        Opponent::Mcts => Box::new(MctsAgent::new(MctsConfig {
            seed: search.seed.wrapping_add(1),
            ..search.config()
        })),
        Opponent::Random => Box::new(RandomBot::new(search.seed.wrapping_add(1))),
    };

    let record = play_game(&mut black, white.as_mut(), board_size, max_moves, |player, mv, state| {
        if !quiet {
            println!("{}", state.board());
            println!("{player} {}", describe(mv));
        }
    })
    .context("self-play game aborted")?;

    let result = compute_game_result(&record.final_state);
    println!("{}", record.final_state.board());
    println!("Moves played: {}", record.moves.len());
    match record.winner {
        Some(winner) if record.final_state.last_move().is_some_and(|mv| mv.is_resign()) => {
            println!("{winner} wins by resignation")
        }
        Some(winner) => println!("{winner} wins: {result}"),
        None => println!("Move limit reached; current count {result}"),
    }
    Ok(())
}

fn run_generate(
    search: &SearchArgs,
    board_size: usize,
    max_moves: usize,
    num_games: usize,
    encoder: &str,
) -> Result<()> {
    let mut num_boards = 0;
    let mut num_targets = 0;
    let mut shape = None;

    for i in 0..num_games {
        info!(game = i + 1, num_games, "generating game");
        let config = MctsConfig {
            seed: search.seed.wrapping_add(2 * i as u64),
            ..search.config()
        };
        let game = generate_game(encoder, board_size, &config, max_moves)
            .with_context(|| format!("generating game {}", i + 1))?;
        num_boards += game.boards.len();
        num_targets += game.moves.len();
        shape = Some(game.shape);
    }

    match shape {
        Some((planes, rows, cols)) => {
            println!("boards: {num_boards} x ({planes}, {rows}, {cols})");
            println!("moves:  {num_targets} x {}", rows * cols);
        }
        None => println!("no games played"),
    }
    Ok(())
}

fn describe(mv: Move) -> String {
    match mv {
        Move::Play(p) => p.to_string(),
        Move::Pass => "passes".to_string(),
        Move::Resign => "resigns".to_string(),
    }
}

fn run_demo() -> Result<()> {
    println!("Goban-MCTS: Go engine with Monte Carlo Tree Search\n");

    // Demo 1: capture
    println!("=== Capture Demo ===");
    let mut game = GameState::new_game(5);
    for vertex in ["C2", "C3", "C4", "pass", "D3", "pass"] {
        game = game.apply_move(Move::parse(vertex)?);
    }
    println!("{}", game.board());
    println!("White stones on board: {}", count(&game, Player::White));
    game = game.apply_move(Move::parse("B3")?);
    println!("Black B3 -> white stones on board: {}", count(&game, Player::White));
    game = game.apply_move(Move::parse("pass")?);
    println!("{}", game.board());

    // Demo 2: scoring
    println!("=== Scoring Demo ===");
    let territory = evaluate_territory(game.board());
    println!(
        "Black: {} stones + {} territory, White: {} stones + {} territory, dame: {}",
        territory.num_black_stones,
        territory.num_black_territory,
        territory.num_white_stones,
        territory.num_white_territory,
        territory.num_dame
    );
    println!("Result: {}\n", compute_game_result(&game));

    // Demo 3: MCTS
    println!("=== MCTS Demo ===");
    let mut bot = MctsAgent::new(MctsConfig {
        rounds: 100,
        ..MctsConfig::default()
    });
    println!("Running 100 MCTS rounds for {}...", game.next_player());
    let best = bot.select_move(&game)?;
    println!("Best move: {best}");
    Ok(())
}

fn count(game: &GameState, player: Player) -> usize {
    let board = game.board();
    board.points().filter(|&p| board.get(p) == Some(player)).count()
}
