//! MCTS search implementation.
//!
//! Every iteration runs the four classic phases:
//! 1. Selection: descend through fully expanded nodes by UCT
//! 2. Expansion: add one random untried column as a new child
//! 3. Simulation: play uniformly random moves until the game ends
//! 4. Backpropagation: credit visits and wins up to the root

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::game::{Board, Piece, TurnRule};

use super::node::NodeId;
use super::stats::SearchStatistics;
use super::tree::MctsTree;

/// Exploration constant of the UCT formula.
pub const UCT_C: f64 = 1.4;

/// Iterations per AI move during interactive play.
pub const LIVE_ITERATIONS: u32 = 800;

/// Iterations used when the caller does not choose.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Result of an MCTS search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Column to play
    pub column: usize,

    /// Per-column statistics of the root's children (empty on fallback)
    pub statistics: SearchStatistics,

    /// Number of iterations performed
    pub iterations: u32,

    /// Nodes allocated in the search tree
    pub tree_nodes: usize,
}

/// MCTS search state. The tree lives only as long as this value.
pub struct MctsSearch<'a, R: Rng> {
    tree: MctsTree,
    turn: TurnRule,
    rng: &'a mut R,
}

impl<'a, R: Rng> MctsSearch<'a, R> {
    /// Create a search rooted at a copy of `board`.
    pub fn new(board: &Board, turn: TurnRule, rng: &'a mut R) -> Result<Self, SearchError> {
        board
            .check_gravity()
            .map_err(|e| SearchError::InvalidInput(e.to_string()))?;

        if board.legal_columns().is_empty() {
            return Err(SearchError::InvalidState(
                "board has no legal columns".to_string(),
            ));
        }

        Ok(Self {
            tree: MctsTree::new(*board),
            turn,
            rng,
        })
    }

    /// Run exactly `iterations` iterations, then pick the most visited move.
    ///
    /// A search runs once. Calling `run` again on the same value is an error,
    /// so the returned statistics always cover exactly `iterations` rollouts.
    pub fn run(&mut self, iterations: u32) -> Result<SearchResult, SearchError> {
        if iterations == 0 {
            return Err(SearchError::InvalidInput(
                "iterations must be > 0".to_string(),
            ));
        }
        if self.tree.get(self.tree.root()).visits > 0 {
            return Err(SearchError::InvalidState(
                "search has already run; start a new one".to_string(),
            ));
        }

        for _ in 0..iterations {
            self.iterate();
        }

        self.result(iterations)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    fn iterate(&mut self) {
        let selected = self.select();
        let node_id = self.expand(selected);
        let winner = self.simulate(node_id);
        self.tree.backpropagate(node_id, winner);
    }

    /// Descend while the node is non-terminal and fully expanded.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.terminal || !node.is_fully_expanded() {
                return current;
            }
            match self.tree.select_child(current, UCT_C) {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Expand one random untried column. Terminal and fully expanded nodes
    /// are returned as is.
    fn expand(&mut self, node_id: NodeId) -> NodeId {
        let node = self.tree.get(node_id);
        if node.terminal || node.is_fully_expanded() {
            return node_id;
        }

        let column = node.untried[self.rng.random_range(0..node.untried.len())];
        let mover = self.turn.piece_to_move(&node.board);
        let child_id = self.tree.expand(node_id, column, mover);

        trace!(
            parent = node_id.0,
            child = child_id.0,
            column,
            mover = mover.name(),
            "expanded node"
        );

        child_id
    }

    fn simulate(&mut self, node_id: NodeId) -> Option<Piece> {
        let board = self.tree.get(node_id).board;
        let first = self.turn.piece_to_move(&board);
        random_playout(board, first, &mut *self.rng)
    }

    fn result(&mut self, iterations: u32) -> Result<SearchResult, SearchError> {
        let (column, statistics) = match self.tree.best_child() {
            Some((column, _)) => (column, self.tree.root_statistics()),
            None => {
                // Only reachable from a root that was already decided.
                let legal = self.tree.get(self.tree.root()).board.legal_columns();
                if legal.is_empty() {
                    return Err(SearchError::InvalidState(
                        "no expanded moves and no legal columns".to_string(),
                    ));
                }
                let column = legal[self.rng.random_range(0..legal.len())];
                (column, SearchStatistics::default())
            }
        };

        let tree_stats = self.tree.stats();
        debug!(
            column,
            iterations,
            root_visits = tree_stats.root_visits,
            nodes = tree_stats.total_nodes,
            max_depth = tree_stats.max_depth,
            "MCTS search complete"
        );

        Ok(SearchResult {
            column,
            statistics,
            iterations,
            tree_nodes: tree_stats.total_nodes,
        })
    }
}

/// Play uniformly random moves from `board`, `first` moving first, until
/// someone wins (returns the winner) or the board fills up (returns None).
pub fn random_playout<R: Rng>(mut board: Board, first: Piece, rng: &mut R) -> Option<Piece> {
    if let Some(winner) = board.winner() {
        return Some(winner);
    }

    let mut mover = first;
    loop {
        let legal = board.legal_columns();
        if legal.is_empty() {
            return None;
        }

        let column = legal[rng.random_range(0..legal.len())];
        if let Some(row) = board.lowest_open_row(column) {
            board.place_piece(row, column, mover);
        }
        // Only the piece that just moved can have completed a new line.
        if board.is_winning_position(mover) {
            return Some(mover);
        }
        mover = mover.other();
    }
}

/// Search `board` with the default turn rule and an OS-seeded random source.
pub fn search(board: &Board, iterations: u32) -> Result<SearchResult, SearchError> {
    let mut rng = StdRng::from_os_rng();
    search_with_rng(board, iterations, TurnRule::default(), &mut rng)
}

/// Search `board` with an explicit turn rule and random source.
pub fn search_with_rng<R: Rng>(
    board: &Board,
    iterations: u32,
    turn: TurnRule,
    rng: &mut R,
) -> Result<SearchResult, SearchError> {
    MctsSearch::new(board, turn, rng)?.run(iterations)
}
