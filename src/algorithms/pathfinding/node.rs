//! Arena storage for A* search nodes.

use crate::grid::Position;

/// Index of a node inside a [`NodeArena`].
pub type NodeId = usize;

/// A single A* search node.
///
/// The parent is stored as an arena index; a parent is always pushed before
/// its children, so following parents strictly decreases the index and
/// every chain terminates at the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub position: Position,
    pub parent: Option<NodeId>,
    /// Path cost from the start.
    pub g: i64,
    /// Heuristic estimate to the goal.
    pub h: i64,
    /// `g + h`.
    pub f: i64,
}

impl PathNode {
    pub fn new(position: Position, parent: Option<NodeId>, g: i64, h: i64) -> Self {
        Self {
            position,
            parent,
            g,
            h,
            f: g + h,
        }
    }
}

/// Append-only node storage for one search.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<PathNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node and returns its id.
    pub fn push(&mut self, node: PathNode) -> NodeId {
        debug_assert!(node.parent.map_or(true, |p| p < self.nodes.len()));
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Positions from the root of the chain to `id`, inclusive.
    pub fn reconstruct(&self, id: NodeId) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            path.push(node.position);
            current = node.parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_is_sum_of_g_and_h() {
        let node = PathNode::new(Position::origin(), None, 14, 30);
        assert_eq!(node.f, 44);
    }

    #[test]
    fn reconstruct_follows_parents_from_root() {
        let mut arena = NodeArena::new();
        let root = arena.push(PathNode::new(Position::new(0, 0), None, 0, 0));
        let mid = arena.push(PathNode::new(Position::new(10, 10), Some(root), 14, 0));
        let _branch = arena.push(PathNode::new(Position::new(10, 0), Some(root), 10, 0));
        let leaf = arena.push(PathNode::new(Position::new(20, 10), Some(mid), 24, 0));

        assert_eq!(
            arena.reconstruct(leaf),
            vec![Position::new(0, 0), Position::new(10, 10), Position::new(20, 10)]
        );
        assert_eq!(arena.reconstruct(root), vec![Position::new(0, 0)]);
        assert_eq!(arena.len(), 4);
    }
}
