//! A* search.
//!
//! - Open list: binary heap keyed by `(f, insertion sequence)`, so among equal
//!   f values the node pushed first is expanded first
//! - Closed list: `FxHashSet` of expanded grids, exact-state membership
//! - Every node lives in a [`NodeArena`]; the heap only stores ids

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::grid::Grid;
use crate::heuristics::Heuristic;
use crate::node::{generate_children, NodeArena, NodeId, SearchNode};
use crate::search::{Evaluator, Outcome, SearchResult, Solution};

/// Heap entry: f value, insertion sequence, node.
type OpenEntry = Reverse<(u32, u64, NodeId)>;

/// Runs A* from `grid` to the standard goal.
///
/// `budget` caps the number of generated nodes: once that many children have
/// been pushed, the next expansion stops the search with
/// [`Outcome::BudgetExceeded`]. Children whose grid was already expanded are
/// neither pushed nor counted. With an admissible, consistent heuristic the
/// first goal popped has minimal cost.
pub fn search<const N: usize, const CELLS: usize>(
    grid: &Grid<N, CELLS>,
    heuristic: Heuristic,
    budget: u64,
) -> SearchResult {
    let mut evaluator = Evaluator::<N, CELLS>::new(heuristic);
    let mut arena = NodeArena::new();
    let mut expanded: FxHashSet<Grid<N, CELLS>> = FxHashSet::default();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();

    let mut root = SearchNode::root(*grid);
    root.evaluation = evaluator.estimate(grid);
    let root_f = root.evaluation;
    let mut sequence = 0u64;
    open.push(Reverse((root_f, sequence, arena.push(root))));

    while let Some(Reverse((_, _, id))) = open.pop() {
        let current = arena[id].grid;
        if current.is_goal() {
            let solution = Solution::new(arena.path(id));
            return evaluator.finish(Outcome::Solved, Some(solution));
        }

        // a grid can sit in the heap more than once; only the first pop counts
        if !expanded.insert(current) {
            continue;
        }

        if evaluator.stats.nodes >= budget {
            log::debug!("astar: budget of {budget} nodes reached, {} open", open.len());
            return evaluator.finish(Outcome::BudgetExceeded, None);
        }

        for mut child in generate_children(&arena, id) {
            if expanded.contains(&child.grid) {
                continue;
            }
            child.evaluation = child.cost + evaluator.estimate(&child.grid);
            let f = child.evaluation;
            sequence += 1;
            open.push(Reverse((f, sequence, arena.push(child))));
            evaluator.stats.nodes += 1;
        }
    }

    evaluator.finish(Outcome::Unsolvable, None)
}
