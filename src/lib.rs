//! Sliding-Tile Puzzle Solver Library
//!
//! Solves N×N sliding-tile puzzles (the 8-, 15- and 24-puzzle family) with
//! A* or recursive best-first search, guided by city-block or
//! linear-conflict estimates.

pub mod astar;
pub mod experiment;
pub mod grid;
pub mod heuristics;
pub mod moves;
pub mod node;
pub mod rbfs;
pub mod scramble;
pub mod search;

use rand::RngCore;

use experiment::{ExperimentConfig, TrialRecord};
use grid::{tokenize, Grid, GridError};
use heuristics::{Heuristic, TargetIndex};
use search::{Algorithm, SearchResult};

/// Trait that erases the compile-time board size for dynamic dispatch.
///
/// Both const generics (`N`, `CELLS`) are hidden behind the vtable, so
/// callers can work with any supported board without turbofish.
pub trait PuzzleOps {
    fn solve(&self, algorithm: Algorithm, heuristic: Heuristic, budget: u64) -> SearchResult;
    fn estimate(&self, heuristic: Heuristic) -> u32;
    fn scrambled(&self, moves: usize, rng: &mut dyn RngCore) -> Box<dyn PuzzleOps>;
    fn run_experiment(&self, config: &ExperimentConfig) -> Vec<TrialRecord>;
    fn is_solvable(&self) -> bool;
    fn is_goal(&self) -> bool;
    fn format_grid(&self) -> String;
    fn compact(&self) -> String;
    fn size(&self) -> usize;
}

impl<const N: usize, const CELLS: usize> PuzzleOps for Grid<N, CELLS> {
    fn solve(&self, algorithm: Algorithm, heuristic: Heuristic, budget: u64) -> SearchResult {
        algorithm.search(self, heuristic, budget)
    }

    fn estimate(&self, heuristic: Heuristic) -> u32 {
        heuristic.evaluate(self, &TargetIndex::new())
    }

    fn scrambled(&self, moves: usize, rng: &mut dyn RngCore) -> Box<dyn PuzzleOps> {
        Box::new(scramble::scramble(self, moves, rng))
    }

    fn run_experiment(&self, config: &ExperimentConfig) -> Vec<TrialRecord> {
        experiment::run::<N, CELLS>(config)
    }

    fn is_solvable(&self) -> bool {
        Grid::is_solvable(self)
    }

    fn is_goal(&self) -> bool {
        Grid::is_goal(self)
    }

    fn format_grid(&self) -> String {
        self.to_string()
    }

    fn compact(&self) -> String {
        self.to_compact()
    }

    fn size(&self) -> usize {
        N
    }
}

/// Parses a textual layout and picks the board size from its cell count.
pub fn parse_grid(text: &str) -> Result<Box<dyn PuzzleOps>, GridError> {
    let cells = tokenize(text)?;
    Ok(match cells.len() {
        4 => Box::new(grid::Grid2::from_slice(&cells)?),
        9 => Box::new(grid::Grid3::from_slice(&cells)?),
        16 => Box::new(grid::Grid4::from_slice(&cells)?),
        25 => Box::new(grid::Grid5::from_slice(&cells)?),
        cells => return Err(GridError::UnsupportedSize { cells }),
    })
}

/// The solved board with side length `size`.
pub fn goal_grid(size: usize) -> Result<Box<dyn PuzzleOps>, GridError> {
    Ok(match size {
        2 => Box::new(grid::Grid2::goal()),
        3 => Box::new(grid::Grid3::goal()),
        4 => Box::new(grid::Grid4::goal()),
        5 => Box::new(grid::Grid5::goal()),
        _ => return Err(GridError::UnsupportedSize { cells: size * size }),
    })
}
