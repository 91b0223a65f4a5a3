//! Random problem generation by walking the blank away from a start layout.
//!
//! Every generated layout is reachable from the start, so scrambling the goal
//! always produces a solvable problem.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::Grid;
use crate::moves::{Direction, DIRECTIONS};

/// Random sequence of `count` legal blank moves starting at `start`.
///
/// A move never immediately undoes the previous one.
pub fn random_walk<const N: usize, const CELLS: usize, R: Rng + ?Sized>(
    start: &Grid<N, CELLS>,
    count: usize,
    rng: &mut R,
) -> Vec<Direction> {
    let mut grid = *start;
    let mut walk: Vec<Direction> = Vec::with_capacity(count);

    for _ in 0..count {
        let previous = walk.last().copied();
        let candidates: Vec<(Direction, Grid<N, CELLS>)> = DIRECTIONS
            .iter()
            .filter(|&&direction| previous != Some(direction.opposite()))
            .filter_map(|&direction| grid.try_move(direction).map(|next| (direction, next)))
            .collect();

        // every cell has at least two exits, so one always survives the filter
        let Some(&(direction, next)) = candidates.choose(rng) else {
            break;
        };
        walk.push(direction);
        grid = next;
    }

    walk
}

/// `start` after `count` random non-reversing blank moves.
pub fn scramble<const N: usize, const CELLS: usize, R: Rng + ?Sized>(
    start: &Grid<N, CELLS>,
    count: usize,
    rng: &mut R,
) -> Grid<N, CELLS> {
    let walk = random_walk(start, count, rng);
    log::trace!("scramble: {}", crate::moves::format_moves(&walk));
    // the walk only contains legal moves
    start.apply_moves(&walk).unwrap_or(*start)
}
