//! Types shared by the search engines.

use std::fmt;
use std::time::{Duration, Instant};

use crate::grid::Grid;
use crate::heuristics::{Heuristic, TargetIndex};
use crate::moves::{format_moves, Direction};
use crate::{astar, rbfs};

/// Node budget used when the caller does not pick one.
pub const DEFAULT_NODE_BUDGET: u64 = 100_000;

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A goal state was reached.
    Solved,
    /// The reachable state space was exhausted without reaching the goal.
    Unsolvable,
    /// The node budget ran out first. Says nothing about solvability.
    BudgetExceeded,
}

impl Outcome {
    pub const fn name(self) -> &'static str {
        match self {
            Outcome::Solved => "solved",
            Outcome::Unsolvable => "unsolvable",
            Outcome::BudgetExceeded => "budget-exceeded",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Effort spent by one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes generated (A*) or checked (RBFS), compared against the budget.
    pub nodes: u64,
    /// Number of heuristic evaluations.
    pub heuristic_calls: u64,
    /// Total time spent inside heuristic evaluations.
    pub heuristic_time: Duration,
    /// Wall-clock time of the whole search.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Share of the run time spent evaluating the heuristic, in percent.
    pub fn heuristic_percent(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.0;
        }
        self.heuristic_time.as_secs_f64() / self.elapsed.as_secs_f64() * 100.0
    }
}

/// A move sequence from the initial grid to the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Direction>,
    /// Number of moves, the g value of the goal node.
    pub cost: u32,
}

impl Solution {
    pub fn new(moves: Vec<Direction>) -> Self {
        let cost = moves.len() as u32;
        Self { moves, cost }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} moves: {}", self.cost, format_moves(&self.moves))
    }
}

/// Everything a search call reports.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub outcome: Outcome,
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    /// Cost of the solution, if one was found.
    pub fn cost(&self) -> Option<u32> {
        self.solution.as_ref().map(|solution| solution.cost)
    }
}

/// Which engine to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Algorithm {
    /// Best-first search with an open list.
    #[value(name = "astar")]
    AStar,
    /// Recursive best-first search, linear memory.
    Rbfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::Rbfs];

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::Rbfs => "rbfs",
        }
    }

    pub fn search<const N: usize, const CELLS: usize>(
        self,
        grid: &Grid<N, CELLS>,
        heuristic: Heuristic,
        budget: u64,
    ) -> SearchResult {
        match self {
            Algorithm::AStar => astar::search(grid, heuristic, budget),
            Algorithm::Rbfs => rbfs::search(grid, heuristic, budget),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Heuristic plus the per-run goal index, counting and timing every call.
pub(crate) struct Evaluator<const N: usize, const CELLS: usize> {
    heuristic: Heuristic,
    targets: TargetIndex<N, CELLS>,
    pub(crate) stats: SearchStats,
    started: Instant,
}

impl<const N: usize, const CELLS: usize> Evaluator<N, CELLS> {
    pub(crate) fn new(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            targets: TargetIndex::new(),
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    #[inline]
    pub(crate) fn estimate(&mut self, grid: &Grid<N, CELLS>) -> u32 {
        let start = Instant::now();
        let estimate = self.heuristic.evaluate(grid, &self.targets);
        self.stats.heuristic_time += start.elapsed();
        self.stats.heuristic_calls += 1;
        estimate
    }

    /// Stops the clock and packages the result.
    pub(crate) fn finish(mut self, outcome: Outcome, solution: Option<Solution>) -> SearchResult {
        self.stats.elapsed = self.started.elapsed();
        log::debug!(
            "{}-puzzle with {}: {} after {} nodes ({:?}, cost {:?})",
            N * N - 1,
            self.heuristic,
            outcome,
            self.stats.nodes,
            self.stats.elapsed,
            solution.as_ref().map(|solution| solution.cost),
        );
        SearchResult {
            outcome,
            solution,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid3;

    #[test]
    fn test_solution_display() {
        let solution = Solution::new(vec![Direction::Left, Direction::Up]);
        assert_eq!(solution.cost, 2);
        assert_eq!(solution.to_string(), "2 moves: LU");
    }

    #[test]
    fn test_evaluator_counts_calls() {
        let mut evaluator = Evaluator::<3, 9>::new(Heuristic::CityBlock);
        assert_eq!(evaluator.estimate(&Grid3::goal()), 0);
        assert_eq!(evaluator.estimate(&Grid3::goal()), 0);
        let result = evaluator.finish(Outcome::Unsolvable, None);
        assert_eq!(result.stats.heuristic_calls, 2);
        assert_eq!(result.cost(), None);
        assert!(!result.is_solved());
    }

    #[test]
    fn test_heuristic_percent_handles_zero_elapsed() {
        assert_eq!(SearchStats::default().heuristic_percent(), 0.0);
    }
}
