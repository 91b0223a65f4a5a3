//! Recursive best-first search.
//!
//! Linear-space best-first search: only the current path and one sibling set
//! per recursion frame are kept. Each frame remembers a *backed-up* f value
//! for every sibling, the best f found below it so far, so a subtree that
//! turned out worse than estimated is not re-entered until everything else
//! looks worse still.
//!
//! Nodes are stored in a [`NodeArena`] used as a stack: a frame pushes its
//! children on entry and truncates them away when it fails.

use crate::grid::Grid;
use crate::heuristics::Heuristic;
use crate::node::{generate_children, NodeArena, NodeId, SearchNode, INFINITY};
use crate::search::{Evaluator, Outcome, SearchResult, Solution};

/// Result of one recursion frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// The goal was reached at this node.
    Found(NodeId),
    /// Nothing below this node fits under the limit; carries the smallest f
    /// value seen beyond it (`INFINITY` for dead ends).
    Failed(u32),
    /// The node budget ran out. Every frame unwinds without further work.
    Aborted,
}

struct Rbfs<const N: usize, const CELLS: usize> {
    arena: NodeArena<N, CELLS>,
    evaluator: Evaluator<N, CELLS>,
    budget: u64,
}

/// Runs RBFS from `grid` to the standard goal.
///
/// `budget` caps the number of non-goal nodes checked; checking one more
/// stops the search with [`Outcome::BudgetExceeded`]. A root failure can
/// only carry `INFINITY` and means every simple path was exhausted, reported
/// as [`Outcome::Unsolvable`]. Optimal with any admissible heuristic.
pub fn search<const N: usize, const CELLS: usize>(
    grid: &Grid<N, CELLS>,
    heuristic: Heuristic,
    budget: u64,
) -> SearchResult {
    let mut evaluator = Evaluator::<N, CELLS>::new(heuristic);
    let mut arena = NodeArena::new();

    let mut root = SearchNode::root(*grid);
    root.evaluation = evaluator.estimate(grid);
    let root_id = arena.push(root);

    let mut rbfs = Rbfs {
        arena,
        evaluator,
        budget,
    };

    match rbfs.descend(root_id, INFINITY) {
        Step::Found(goal) => {
            let solution = Solution::new(rbfs.arena.path(goal));
            rbfs.evaluator.finish(Outcome::Solved, Some(solution))
        }
        Step::Failed(_) => rbfs.evaluator.finish(Outcome::Unsolvable, None),
        Step::Aborted => {
            log::debug!("rbfs: budget of {budget} nodes reached");
            rbfs.evaluator.finish(Outcome::BudgetExceeded, None)
        }
    }
}

impl<const N: usize, const CELLS: usize> Rbfs<N, CELLS> {
    /// Explores below `id` while its best child stays within `f_limit`.
    fn descend(&mut self, id: NodeId, f_limit: u32) -> Step {
        if self.arena[id].grid.is_goal() {
            return Step::Found(id);
        }

        self.evaluator.stats.nodes += 1;
        if self.evaluator.stats.nodes > self.budget {
            return Step::Aborted;
        }

        let frame_start = self.arena.len();
        let mut siblings: Vec<NodeId> = Vec::with_capacity(4);
        for mut child in generate_children(&self.arena, id) {
            // a state already on the path can only lead to a longer solution
            if self.on_path(id, &child.grid) {
                continue;
            }
            child.evaluation = child.cost + self.evaluator.estimate(&child.grid);
            siblings.push(self.arena.push(child));
        }

        if siblings.is_empty() {
            return Step::Failed(INFINITY);
        }

        loop {
            // ids grow in generation order, so they break ties
            let arena = &self.arena;
            siblings.sort_by_key(|&sibling| (arena[sibling].evaluation, sibling));

            let best = siblings[0];
            let best_f = self.arena[best].evaluation;
            if best_f == INFINITY || best_f > f_limit {
                self.arena.truncate(frame_start);
                return Step::Failed(best_f);
            }

            let alternative = siblings
                .get(1)
                .map_or(INFINITY, |&sibling| self.arena[sibling].evaluation);

            match self.descend(best, f_limit.min(alternative)) {
                Step::Failed(backed_up) => {
                    log::trace!(
                        "rbfs: backed up {best_f} -> {backed_up} at depth {}",
                        self.arena[best].cost
                    );
                    self.arena.get_mut(best).evaluation = backed_up;
                }
                done => return done,
            }
        }
    }

    /// Whether `grid` already appears on the path from the root to `id`.
    fn on_path(&self, id: NodeId, grid: &Grid<N, CELLS>) -> bool {
        self.arena.ancestors(id).any(|node| node.grid == *grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar;
    use crate::grid::{Grid2, Grid3, Grid4};
    use crate::moves::Direction;
    use crate::scramble::scramble;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_goal_input_costs_nothing() {
        let result = search(&Grid4::goal(), Heuristic::CityBlock, 1000);
        assert_eq!(result.outcome, Outcome::Solved);
        assert_eq!(result.cost(), Some(0));
        assert_eq!(result.stats.nodes, 0);
    }

    #[test]
    fn test_one_move_from_goal() {
        let grid = Grid4::goal().try_move(Direction::Left).unwrap();
        for heuristic in Heuristic::ALL {
            let result = search(&grid, heuristic, 1000);
            assert_eq!(result.cost(), Some(1), "{heuristic}");
            assert_eq!(result.stats.nodes, 1);
            assert_eq!(result.solution.unwrap().moves, vec![Direction::Right]);
        }
    }

    #[test]
    fn test_two_moves_from_goal() {
        let grid = Grid4::goal()
            .apply_moves(&[Direction::Left, Direction::Up])
            .unwrap();
        let result = search(&grid, Heuristic::CityBlock, 1000);
        assert_eq!(result.cost(), Some(2));
        let moves = result.solution.unwrap().moves;
        assert_eq!(moves, vec![Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_budget_of_one_aborts() {
        let grid = Grid4::goal()
            .apply_moves(&[Direction::Left, Direction::Up, Direction::Left, Direction::Up])
            .unwrap();
        let result = search(&grid, Heuristic::CityBlock, 1);
        assert_eq!(result.outcome, Outcome::BudgetExceeded);
        assert!(result.solution.is_none());
        assert_eq!(result.stats.nodes, 2);
    }

    #[test]
    fn test_unsolvable_2x2_runs_out_of_paths() {
        let grid = Grid2::from_cells([2, 1, 3, 0]).unwrap();
        let result = search(&grid, Heuristic::CityBlock, 100_000);
        assert_eq!(result.outcome, Outcome::Unsolvable);
        assert_eq!(result.stats.nodes, 50);
    }

    #[test]
    fn test_matches_astar_cost() {
        let mut rng = SmallRng::seed_from_u64(42);
        for moves in [4, 8, 12, 16] {
            let grid = scramble(&Grid4::goal(), moves, &mut rng);
            let expected = astar::search(&grid, Heuristic::CityBlock, 500_000);
            let result = search(&grid, Heuristic::CityBlock, 5_000_000);
            assert_eq!(result.outcome, Outcome::Solved, "{grid}");
            assert_eq!(result.cost(), expected.cost(), "{grid}");
        }
    }

    #[test]
    fn test_linear_conflict_keeps_optimal_cost() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..3 {
            let grid = scramble(&Grid3::goal(), 16, &mut rng);
            let city_block = search(&grid, Heuristic::CityBlock, 5_000_000);
            let conflict = search(&grid, Heuristic::LinearConflict, 5_000_000);
            assert_eq!(conflict.outcome, Outcome::Solved, "{grid}");
            assert_eq!(conflict.cost(), city_block.cost(), "{grid}");
        }
    }

    #[test]
    fn test_solution_replays_to_goal() {
        let mut rng = SmallRng::seed_from_u64(9);
        let grid = scramble(&Grid4::goal(), 14, &mut rng);
        let result = search(&grid, Heuristic::LinearConflict, 5_000_000);
        let moves = result.solution.expect("solved").moves;
        assert_eq!(grid.apply_moves(&moves), Some(Grid4::goal()));
    }
}
