//! MCTS tree node representation.
//!
//! Each node holds the board reached by one move from its parent, plus the
//! visit and win counters that backpropagation maintains.

use crate::game::{Board, Piece};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Board after the move that produced this node. Never mutated.
    pub board: Board,

    /// Parent node index (None for root)
    pub parent: Option<NodeId>,

    /// Expanded children as (column, NodeId), in expansion order.
    pub children: Vec<(usize, NodeId)>,

    /// Legal columns that have no child yet.
    pub untried: Vec<usize>,

    /// Number of rollouts that passed through this node
    pub visits: u32,

    /// Rollouts won by `mover`
    pub wins: u32,

    /// Column that led here from the parent (None for root)
    pub column: Option<usize>,

    /// Piece that played `column` (None for root)
    pub mover: Option<Piece>,

    /// Cached `board.is_terminal()`
    pub terminal: bool,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(board: Board) -> Self {
        Self::new(board, None, None, None)
    }

    /// Create a new child node.
    pub fn new_child(board: Board, parent: NodeId, column: usize, mover: Piece) -> Self {
        Self::new(board, Some(parent), Some(column), Some(mover))
    }

    fn new(
        board: Board,
        parent: Option<NodeId>,
        column: Option<usize>,
        mover: Option<Piece>,
    ) -> Self {
        Self {
            board,
            parent,
            children: Vec::new(),
            untried: board.legal_columns(),
            visits: 0,
            wins: 0,
            column,
            mover,
            terminal: board.is_terminal(),
        }
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// wins / visits, or 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// UCT(s) = wins/visits + c * sqrt(ln(N_parent) / visits)
    ///
    /// Unvisited nodes score +inf so every child is tried once before
    /// exploitation kicks in.
    #[inline]
    pub fn uct_score(&self, parent_visits: u32, c: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let exploration = if parent_visits == 0 {
            0.0
        } else {
            c * ((parent_visits as f64).ln() / self.visits as f64).sqrt()
        };
        self.win_rate() + exploration
    }
}
