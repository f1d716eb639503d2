//! Monte Carlo Tree Search with UCT selection and random playouts.
//!
//! Each call to [`MctsAgent::select_move`] builds a fresh tree rooted at the
//! given state and runs a fixed number of rounds:
//!
//! 1. descend from the root through fully expanded, non-terminal nodes,
//!    picking the child with the highest UCT score;
//! 2. expand one random unexplored move of the node reached;
//! 3. play random moves from the new node until the game ends;
//! 4. credit the winner at every node on the path back to the root.
//!
//! The move returned is the root child with the best win fraction for the
//! player to move. Ties go to the child expanded first, so a given seed
//! always produces the same move.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::agent::{Agent, RandomBot};
use crate::constants::{DEFAULT_ROUNDS, DEFAULT_SEED, DEFAULT_TEMPERATURE};
use crate::error::GoError;
use crate::game::GameState;
use crate::types::{Move, Player};

/// A node in the search tree.
pub struct TreeNode {
    /// The game position at this node
    pub game_state: Rc<GameState>,
    /// The move that led here from the parent (`None` at the root)
    pub mv: Option<Move>,
    /// Playouts won, indexed by `Player::index`
    win_counts: [u32; 2],
    /// Playouts that passed through this node
    pub num_rollouts: u32,
    /// Expanded children, in expansion order
    pub children: Vec<TreeNode>,
    /// Legal moves not yet expanded
    unvisited_moves: Vec<Move>,
}

impl TreeNode {
    /// Create a node for `game_state`. Finished games have nothing to expand.
    pub fn new(game_state: Rc<GameState>, mv: Option<Move>) -> Self {
        let unvisited_moves = if game_state.is_over() {
            Vec::new()
        } else {
            game_state.legal_moves()
        };
        Self {
            game_state,
            mv,
            win_counts: [0, 0],
            num_rollouts: 0,
            children: Vec::new(),
            unvisited_moves,
        }
    }

    #[inline]
    pub fn can_add_child(&self) -> bool {
        !self.unvisited_moves.is_empty()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.game_state.is_over()
    }

    pub fn unvisited_moves(&self) -> &[Move] {
        &self.unvisited_moves
    }

    pub fn win_count(&self, player: Player) -> u32 {
        self.win_counts[player.index()]
    }

    /// Expand one unexplored move chosen uniformly at random.
    ///
    /// Returns the index of the new child.
    pub fn add_random_child(&mut self, rng: &mut fastrand::Rng) -> usize {
        let index = rng.usize(..self.unvisited_moves.len());
        let mv = self.unvisited_moves.remove(index);
        let state = self.game_state.apply_move(mv);
        self.children.push(TreeNode::new(state, Some(mv)));
        self.children.len() - 1
    }

    pub fn record_win(&mut self, winner: Player) {
        self.win_counts[winner.index()] += 1;
        self.num_rollouts += 1;
    }

    /// Fraction of playouts through this node won by `player`.
    ///
    /// Panics if no playout has been recorded yet.
    pub fn winning_frac(&self, player: Player) -> f64 {
        assert!(
            self.num_rollouts > 0,
            "win fraction read from a node with no rollouts"
        );
        self.win_count(player) as f64 / self.num_rollouts as f64
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// UCT score: exploitation term plus a temperature-weighted exploration
/// bonus that shrinks as the child is visited more.
pub fn uct_score(parent_rollouts: u32, child_rollouts: u32, win_pct: f64, temperature: f64) -> f64 {
    let exploration = ((parent_rollouts as f64).ln() / child_rollouts as f64).sqrt();
    win_pct + temperature * exploration
}

/// Search settings.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Rounds per move
    pub rounds: usize,
    /// Exploration weight in the UCT formula
    pub temperature: f64,
    /// RNG seed for expansion and playouts
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            temperature: DEFAULT_TEMPERATURE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Plays by running a fresh MCTS search for every move.
pub struct MctsAgent {
    config: MctsConfig,
    rng: fastrand::Rng,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        Self { config, rng }
    }

    /// Run the configured number of rounds and return the tree.
    pub fn search(&mut self, game_state: &Rc<GameState>) -> TreeNode {
        let mut root = TreeNode::new(Rc::clone(game_state), None);

        for _ in 0..self.config.rounds {
            let path = self.tree_descend(&mut root);
            let leaf = get_leaf_state(&root, &path);
            let winner = simulate_random_game(leaf, &mut self.rng);
            tree_update(&mut root, &path, winner);
        }

        root
    }

    /// Walk down to a node that can still be expanded (or a terminal one),
    /// expand it, and return the child indices taken from the root.
    fn tree_descend(&mut self, root: &mut TreeNode) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = root;

        while !node.can_add_child() && !node.is_terminal() {
            let idx = select_child(node, self.config.temperature);
            path.push(idx);
            node = &mut node.children[idx];
        }

        if node.can_add_child() {
            path.push(node.add_random_child(&mut self.rng));
        }

        path
    }
}

impl Agent for MctsAgent {
    fn select_move(&mut self, game_state: &Rc<GameState>) -> Result<Move, GoError> {
        let root = self.search(game_state);
        let mover = game_state.next_player();

        for child in &root.children {
            trace!(
                mv = ?child.mv,
                rollouts = child.num_rollouts,
                wins = child.win_count(mover),
                "root child"
            );
        }

        let (mv, pct) = best_move(&root, mover).ok_or(GoError::NoMoveSelected)?;
        debug!(
            %mover,
            %mv,
            win_frac = pct,
            rounds = self.config.rounds,
            nodes = root.size(),
            "mcts selected move"
        );
        Ok(mv)
    }
}

/// The child with the best UCT score for the player to move at `node`.
///
/// Panics if `node` has no children; only called on fully expanded,
/// non-terminal nodes, which always have some.
fn select_child(node: &TreeNode, temperature: f64) -> usize {
    let player = node.game_state.next_player();
    let mut best_score = f64::NEG_INFINITY;
    let mut best_child = None;

    for (i, child) in node.children.iter().enumerate() {
        let score = uct_score(
            node.num_rollouts,
            child.num_rollouts,
            child.winning_frac(player),
            temperature,
        );
        if score > best_score {
            best_score = score;
            best_child = Some(i);
        }
    }

    best_child.expect("fully expanded node has no children")
}

/// The root child with the highest win fraction for `player`, first found on
/// ties.
fn best_move(root: &TreeNode, player: Player) -> Option<(Move, f64)> {
    let mut best: Option<(Move, f64)> = None;
    for child in &root.children {
        let pct = child.winning_frac(player);
        if best.is_none_or(|(_, best_pct)| pct > best_pct) {
            best = child.mv.map(|mv| (mv, pct));
        }
    }
    best
}

fn get_leaf_state(root: &TreeNode, path: &[usize]) -> Rc<GameState> {
    let leaf = path.iter().fold(root, |node, &idx| &node.children[idx]);
    Rc::clone(&leaf.game_state)
}

/// Credit `winner` at the root and every node along `path`.
fn tree_update(root: &mut TreeNode, path: &[usize], winner: Player) {
    let mut node = root;
    node.record_win(winner);
    for &idx in path {
        node = &mut node.children[idx];
        node.record_win(winner);
    }
}

/// Play random moves until the game ends and return the winner.
pub fn simulate_random_game(mut game: Rc<GameState>, rng: &mut fastrand::Rng) -> Player {
    while !game.is_over() {
        let mv = RandomBot::choose(rng, &game);
        game = game.apply_move(mv);
    }
    game.winner()
}
