//! MCTS tree structure with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by NodeId. Children
//! are owned through the parent's `children` list; the `parent` index is only
//! followed upwards during backpropagation.

use crate::game::{Board, Piece};

use super::node::{MctsNode, NodeId};
use super::stats::SearchStatistics;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// Create a new tree rooted at `board`.
    pub fn new(board: Board) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(MctsNode::new_root(board));
        Self { nodes }
    }

    /// Root node ID (always the first arena slot).
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in allocation order.
    pub fn nodes(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Child of `node_id` with the highest UCT score. On equal scores the
    /// child expanded first wins.
    pub fn select_child(&self, node_id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best: Option<(f64, NodeId)> = None;

        for &(_, child_id) in &node.children {
            let score = self.get(child_id).uct_score(node.visits, c);
            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, child_id)),
            }
        }

        best.map(|(_, id)| id)
    }

    /// Expand `column` from `parent_id` with `mover` dropping a piece, and
    /// return the new child.
    ///
    /// The column must be in the parent's untried list; it is removed from
    /// there so a column is never expanded twice.
    pub fn expand(&mut self, parent_id: NodeId, column: usize, mover: Piece) -> NodeId {
        let parent = self.get_mut(parent_id);
        if let Some(pos) = parent.untried.iter().position(|&c| c == column) {
            parent.untried.remove(pos);
        }

        let mut board = parent.board;
        if let Some(row) = board.lowest_open_row(column) {
            board.place_piece(row, column, mover);
        }

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MctsNode::new_child(board, parent_id, column, mover));
        self.get_mut(parent_id).children.push((column, child_id));

        child_id
    }

    /// Walk from `leaf_id` to the root, adding one visit everywhere and one
    /// win to each node whose mover is the rollout `winner`.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Option<Piece>) {
        let mut current = Some(leaf_id);

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if winner.is_some() && node.mover == winner {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// Most visited root child as (column, NodeId). On equal visits the child
    /// expanded first wins.
    pub fn best_child(&self) -> Option<(usize, NodeId)> {
        let root = self.get(self.root());
        let mut best: Option<(u32, usize, NodeId)> = None;

        for &(column, child_id) in &root.children {
            let visits = self.get(child_id).visits;
            match best {
                Some((best_visits, _, _)) if visits <= best_visits => {}
                _ => best = Some((visits, column, child_id)),
            }
        }

        best.map(|(_, column, id)| (column, id))
    }

    /// Statistics for every expanded root child.
    pub fn root_statistics(&self) -> SearchStatistics {
        let root = self.get(self.root());
        SearchStatistics::from_counts(root.children.iter().map(|&(column, id)| {
            let child = self.get(id);
            (column, child.visits, child.wins)
        }))
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: self.get(self.root()).visits,
            max_depth: self.compute_max_depth(self.root(), 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        self.get(node_id)
            .children
            .iter()
            .map(|&(_, id)| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(Board::new());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
        assert!(tree.best_child().is_none());
        assert!(tree.root_statistics().is_empty());
    }

    #[test]
    fn test_expand() {
        let mut tree = MctsTree::new(Board::new());

        let child_id = tree.expand(tree.root(), 4, Piece::Ai);

        assert_eq!(child_id, NodeId(1));
        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(4, NodeId(1))]);
        assert_eq!(root.untried, vec![0, 1, 2, 3, 5, 6]);
        // Root board is untouched
        assert_eq!(root.board.piece_count(), 0);

        let child = tree.get(child_id);
        assert_eq!(child.parent, Some(tree.root()));
        assert_eq!(child.column, Some(4));
        assert_eq!(child.mover, Some(Piece::Ai));
        assert_eq!(child.board.get(0, 4), Cell::Ai);
        assert_eq!(child.board.piece_count(), 1);
    }

    #[test]
    fn test_backpropagate_credits_mover() {
        let mut tree = MctsTree::new(Board::new());

        // root -> AI move -> Player move
        let child_id = tree.expand(tree.root(), 0, Piece::Ai);
        let grandchild_id = tree.expand(child_id, 1, Piece::Player);

        tree.backpropagate(grandchild_id, Some(Piece::Ai));

        assert_eq!(tree.get(grandchild_id).visits, 1);
        assert_eq!(tree.get(child_id).visits, 1);
        assert_eq!(tree.get(tree.root()).visits, 1);

        assert_eq!(tree.get(grandchild_id).wins, 0);
        assert_eq!(tree.get(child_id).wins, 1);
        // Root has no mover and never gets win credit
        assert_eq!(tree.get(tree.root()).wins, 0);

        tree.backpropagate(grandchild_id, Some(Piece::Player));
        assert_eq!(tree.get(grandchild_id).wins, 1);
        assert_eq!(tree.get(child_id).wins, 1);
        assert_eq!(tree.get(tree.root()).visits, 2);
    }

    #[test]
    fn test_backpropagate_draw_adds_no_wins() {
        let mut tree = MctsTree::new(Board::new());
        let child_id = tree.expand(tree.root(), 2, Piece::Ai);

        tree.backpropagate(child_id, None);

        assert_eq!(tree.get(child_id).visits, 1);
        assert_eq!(tree.get(child_id).wins, 0);
        assert_eq!(tree.get(tree.root()).visits, 1);
    }

    #[test]
    fn test_select_child_prefers_unvisited_then_first() {
        let mut tree = MctsTree::new(Board::new());
        let a = tree.expand(tree.root(), 0, Piece::Ai);
        let b = tree.expand(tree.root(), 1, Piece::Ai);
        let c = tree.expand(tree.root(), 2, Piece::Ai);

        // All unvisited: the first expanded wins the +inf tie
        assert_eq!(tree.select_child(tree.root(), 1.4), Some(a));

        tree.backpropagate(a, Some(Piece::Ai));
        assert_eq!(tree.select_child(tree.root(), 1.4), Some(b));

        tree.backpropagate(b, None);
        tree.backpropagate(c, None);
        // Same exploration term, `a` has the better win rate
        assert_eq!(tree.select_child(tree.root(), 1.4), Some(a));
    }

    #[test]
    fn test_select_child_ties_go_to_first() {
        let mut tree = MctsTree::new(Board::new());
        let a = tree.expand(tree.root(), 5, Piece::Ai);
        let b = tree.expand(tree.root(), 3, Piece::Ai);
        tree.backpropagate(a, None);
        tree.backpropagate(b, None);

        assert_eq!(tree.select_child(tree.root(), 1.4), Some(a));
    }

    #[test]
    fn test_best_child_by_visits() {
        let mut tree = MctsTree::new(Board::new());
        let a = tree.expand(tree.root(), 6, Piece::Ai);
        let b = tree.expand(tree.root(), 2, Piece::Ai);

        tree.backpropagate(a, None);
        tree.backpropagate(b, None);
        // Tie: first expanded
        assert_eq!(tree.best_child(), Some((6, a)));

        tree.backpropagate(b, Some(Piece::Player));
        assert_eq!(tree.best_child(), Some((2, b)));

        let stats = tree.root_statistics();
        assert_eq!(stats.get(2).unwrap().visits, 2);
        assert_eq!(stats.get(2).unwrap().visit_ratio, 1.0);
        assert!((stats.get(6).unwrap().visit_ratio - 0.5).abs() < 1e-12);
        assert_eq!(stats.get(2).unwrap().win_rate, 0.0);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(Board::new());
        let child = tree.expand(tree.root(), 0, Piece::Ai);
        tree.expand(child, 0, Piece::Player);
        tree.expand(tree.root(), 1, Piece::Ai);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_visits, 0);
    }
}
