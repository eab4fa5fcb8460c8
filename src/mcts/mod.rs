//! Monte Carlo Tree Search over Connect Four.
//!
//! A fresh tree is built for every call, rooted at a copy of the caller's
//! board, and dropped once the move is chosen. Nodes live in an arena
//! ([`MctsTree`]) and point back to their parent by [`NodeId`].
//!
//! ```rust
//! use mcts_connect_four::game::Board;
//! use mcts_connect_four::mcts::search;
//!
//! let result = search(&Board::new(), 200).unwrap();
//! assert!(result.column < 7);
//! ```

mod node;
mod search;
mod stats;
mod tree;

pub use node::{MctsNode, NodeId};
pub use search::{
    random_playout, search, search_with_rng, MctsSearch, SearchResult, DEFAULT_ITERATIONS,
    LIVE_ITERATIONS, UCT_C,
};
pub use stats::{ColumnStats, SearchStatistics};
pub use tree::{MctsTree, TreeStats};
