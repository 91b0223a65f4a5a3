//! Search nodes and the arena that holds them.
//!
//! Nodes own their grid. Parent links are indices into a [`NodeArena`], so
//! the search tree only has owning edges from the arena down to each node
//! and plain indices pointing back up.

use std::ops::Index;

use crate::grid::Grid;
use crate::moves::{Direction, DIRECTIONS};

/// Evaluation value meaning "never worth expanding".
pub const INFINITY: u32 = u32::MAX;

/// Index of a node inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One state in the search tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode<const N: usize, const CELLS: usize> {
    pub grid: Grid<N, CELLS>,
    /// Moves from the initial state (g).
    pub cost: u32,
    /// Node this one was generated from; `None` for the root.
    pub parent: Option<NodeId>,
    /// How the blank moved to get here from the parent.
    pub moved: Option<Direction>,
    /// f, or the backed-up f in RBFS. Scratch space for the searches.
    pub evaluation: u32,
}

impl<const N: usize, const CELLS: usize> SearchNode<N, CELLS> {
    /// Root node: cost 0, no parent.
    pub fn root(grid: Grid<N, CELLS>) -> Self {
        Self {
            grid,
            cost: 0,
            parent: None,
            moved: None,
            evaluation: 0,
        }
    }
}

/// Append-only (or stack-like) storage for search nodes.
///
/// A* keeps every node it creates. RBFS truncates back to a saved length
/// when a recursion frame returns, which keeps memory proportional to the
/// search depth.
#[derive(Debug, Default)]
pub struct NodeArena<const N: usize, const CELLS: usize> {
    nodes: Vec<SearchNode<N, CELLS>>,
}

impl<const N: usize, const CELLS: usize> NodeArena<N, CELLS> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: SearchNode<N, CELLS>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<N, CELLS> {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node pushed after the arena had `len` nodes.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Iterates from `id` up to the root, `id` first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SearchNode<N, CELLS>> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let node = &self[next?];
            next = node.parent;
            Some(node)
        })
    }

    /// Moves from the root to `id`, in the order they were made.
    pub fn path(&self, id: NodeId) -> Vec<Direction> {
        let mut moves: Vec<Direction> = self.ancestors(id).filter_map(|node| node.moved).collect();
        moves.reverse();
        moves
    }
}

impl<const N: usize, const CELLS: usize> Index<NodeId> for NodeArena<N, CELLS> {
    type Output = SearchNode<N, CELLS>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

/// Every state reachable from `id` by one blank move.
///
/// Children come out in [`DIRECTIONS`] order (up, left, right, down), skipping
/// moves that would leave the board, so there are always 2 to 4 of them. Each
/// child owns a fresh copy of the grid, costs one more than its parent and
/// points back at `id`. The result depends only on the node, so repeated
/// calls return identical children.
pub fn generate_children<const N: usize, const CELLS: usize>(
    arena: &NodeArena<N, CELLS>,
    id: NodeId,
) -> Vec<SearchNode<N, CELLS>> {
    let parent = &arena[id];
    DIRECTIONS
        .iter()
        .filter_map(|&direction| {
            parent.grid.try_move(direction).map(|grid| SearchNode {
                grid,
                cost: parent.cost + 1,
                parent: Some(id),
                moved: Some(direction),
                evaluation: 0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid3, Grid4};

    #[test]
    fn test_corner_has_two_children_in_canonical_order() {
        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(Grid4::goal()));

        let children = generate_children(&arena, root);
        let moves: Vec<_> = children.iter().map(|child| child.moved).collect();
        assert_eq!(moves, vec![Some(Direction::Up), Some(Direction::Left)]);
        for child in &children {
            assert_eq!(child.cost, 1);
            assert_eq!(child.parent, Some(root));
        }
    }

    #[test]
    fn test_center_has_four_children() {
        let grid = Grid3::goal()
            .apply_moves(&[Direction::Up, Direction::Left])
            .unwrap();
        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(grid));

        let moves: Vec<_> = generate_children(&arena, root)
            .into_iter()
            .filter_map(|child| child.moved)
            .collect();
        assert_eq!(moves, DIRECTIONS.to_vec());
    }

    #[test]
    fn test_generate_children_is_idempotent() {
        let grid = Grid4::goal()
            .apply_moves(&[Direction::Up, Direction::Up, Direction::Left])
            .unwrap();
        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(grid));

        assert_eq!(generate_children(&arena, root), generate_children(&arena, root));
    }

    #[test]
    fn test_parent_grid_is_untouched() {
        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(Grid4::goal()));
        let _ = generate_children(&arena, root);
        assert_eq!(arena[root].grid, Grid4::goal());
    }

    #[test]
    fn test_path_reconstruction() {
        let mut arena = NodeArena::new();
        let mut id = arena.push(SearchNode::root(Grid4::goal()));
        for direction in [Direction::Up, Direction::Left, Direction::Left] {
            let child = generate_children(&arena, id)
                .into_iter()
                .find(|child| child.moved == Some(direction))
                .unwrap();
            id = arena.push(child);
        }

        assert_eq!(arena[id].cost, 3);
        assert_eq!(
            arena.path(id),
            vec![Direction::Up, Direction::Left, Direction::Left]
        );
        assert_eq!(arena.ancestors(id).count(), 4);
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let mut arena = NodeArena::new();
        let root = arena.push(SearchNode::root(Grid4::goal()));
        for child in generate_children(&arena, root) {
            arena.push(child);
        }
        assert_eq!(arena.len(), 3);
        arena.truncate(1);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena[root].grid, Grid4::goal());
    }
}
