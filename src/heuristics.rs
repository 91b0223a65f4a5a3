//! Heuristic estimators of the remaining move count.
//!
//! All estimators are pure functions of a grid and a [`TargetIndex`]; none of
//! them mutate the grid. Which ones are admissible is reported by
//! [`Heuristic::is_admissible`].

use std::fmt;

use crate::grid::{cell_to_coord, Grid, BLANK};

/// Goal (row, col) of every label, indexed by label.
///
/// Built once per search run and shared read-only by every evaluation, so a
/// goal lookup is a single array read instead of a scan of the goal grid.
#[derive(Clone, Copy, Debug)]
pub struct TargetIndex<const N: usize, const CELLS: usize> {
    positions: [(u8, u8); CELLS],
}

impl<const N: usize, const CELLS: usize> TargetIndex<N, CELLS> {
    /// Index for the standard goal layout.
    pub fn new() -> Self {
        Self::from_goal(&Grid::goal())
    }

    /// Index for an arbitrary goal layout.
    pub fn from_goal(goal: &Grid<N, CELLS>) -> Self {
        let mut positions = [(0u8, 0u8); CELLS];
        for (cell, &label) in goal.cells().iter().enumerate() {
            let (row, col) = cell_to_coord::<N>(cell);
            positions[label as usize] = (row as u8, col as u8);
        }
        Self { positions }
    }

    /// Goal (row, col) of `label`.
    #[inline(always)]
    pub fn target(&self, label: u8) -> (usize, usize) {
        let (row, col) = self.positions[label as usize];
        (row as usize, col as usize)
    }
}

impl<const N: usize, const CELLS: usize> Default for TargetIndex<N, CELLS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which estimator a search uses.
///
/// The tag doubles as the display name in logs, CSV output and the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// Sum of Manhattan distances. Admissible.
    CityBlock,
    /// City block plus two moves per linear conflict. Admissible up to 4×4,
    /// see [`line_conflicts`].
    LinearConflict,
    /// City block plus each misplaced tile's distance to the blank.
    /// Not admissible.
    BlankDistance,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::CityBlock,
        Heuristic::LinearConflict,
        Heuristic::BlankDistance,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Heuristic::CityBlock => "city-block",
            Heuristic::LinearConflict => "linear-conflict",
            Heuristic::BlankDistance => "blank-distance",
        }
    }

    /// Whether the estimate never exceeds the true remaining cost.
    ///
    /// Searches only guarantee optimal solutions with admissible estimators.
    pub const fn is_admissible(self) -> bool {
        !matches!(self, Heuristic::BlankDistance)
    }

    #[inline]
    pub fn evaluate<const N: usize, const CELLS: usize>(
        self,
        grid: &Grid<N, CELLS>,
        targets: &TargetIndex<N, CELLS>,
    ) -> u32 {
        match self {
            Heuristic::CityBlock => city_block(grid, targets),
            Heuristic::LinearConflict => linear_conflict(grid, targets),
            Heuristic::BlankDistance => blank_distance(grid, targets),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum over all tiles of the row distance plus column distance to the goal.
///
/// Zero exactly when the grid is solved.
pub fn city_block<const N: usize, const CELLS: usize>(
    grid: &Grid<N, CELLS>,
    targets: &TargetIndex<N, CELLS>,
) -> u32 {
    let mut total = 0;
    for (cell, &label) in grid.cells().iter().enumerate() {
        if label == BLANK {
            continue;
        }
        let (row, col) = cell_to_coord::<N>(cell);
        let (goal_row, goal_col) = targets.target(label);
        total += (row.abs_diff(goal_row) + col.abs_diff(goal_col)) as u32;
    }
    total
}

/// City block plus two moves for every tile that has to leave its line.
///
/// Tiles sharing a goal row (or column) with the line they currently sit in
/// but appearing in reversed order block each other: one of them must step
/// out of the line and back. Row and column conflicts are counted separately.
///
/// The removal set per line is found greedily, see [`line_conflicts`].
pub fn linear_conflict<const N: usize, const CELLS: usize>(
    grid: &Grid<N, CELLS>,
    targets: &TargetIndex<N, CELLS>,
) -> u32 {
    let mut conflicts = 0;

    for line in 0..N {
        // goal columns of the tiles in this row whose goal row is this row
        let mut row_goals = [0usize; N];
        let mut row_len = 0;
        // goal rows of the tiles in this column whose goal column is this column
        let mut col_goals = [0usize; N];
        let mut col_len = 0;

        for offset in 0..N {
            let label = grid.tile(line, offset);
            if label != BLANK {
                let (goal_row, goal_col) = targets.target(label);
                if goal_row == line {
                    row_goals[row_len] = goal_col;
                    row_len += 1;
                }
            }

            let label = grid.tile(offset, line);
            if label != BLANK {
                let (goal_row, goal_col) = targets.target(label);
                if goal_col == line {
                    col_goals[col_len] = goal_row;
                    col_len += 1;
                }
            }
        }

        conflicts += line_conflicts(&row_goals[..row_len]);
        conflicts += line_conflicts(&col_goals[..col_len]);
    }

    city_block(grid, targets) + 2 * conflicts
}

/// Number of tiles that must leave a line so the rest are in goal order.
///
/// `goals` lists, in line order, the goal offset of every participating tile.
/// Repeatedly removes the tile inverted against the most remaining tiles
/// (first in line order on ties) until no inversions are left. Finding the
/// true minimum is `len - LIS`; the greedy choice matches it on lines of up
/// to four tiles.
pub fn line_conflicts(goals: &[usize]) -> u32 {
    let mut removed = [false; 64];
    let mut tally = 0;

    loop {
        let mut worst = None;
        let mut worst_count = 0;

        for (i, &goal_i) in goals.iter().enumerate() {
            if removed[i] {
                continue;
            }
            let count = goals
                .iter()
                .enumerate()
                .filter(|&(j, &goal_j)| {
                    !removed[j] && ((i < j && goal_i > goal_j) || (i > j && goal_i < goal_j))
                })
                .count();
            if count > worst_count {
                worst_count = count;
                worst = Some(i);
            }
        }

        match worst {
            Some(i) => {
                removed[i] = true;
                tally += 1;
            }
            None => return tally,
        }
    }
}

/// For every misplaced tile, its city-block distance to the goal plus its
/// city-block distance to the blank.
///
/// Overestimates on most boards, so searches using it trade optimality for
/// fewer expansions.
pub fn blank_distance<const N: usize, const CELLS: usize>(
    grid: &Grid<N, CELLS>,
    targets: &TargetIndex<N, CELLS>,
) -> u32 {
    let (blank_row, blank_col) = grid.blank();
    let mut total = 0;
    for (cell, &label) in grid.cells().iter().enumerate() {
        if label == BLANK {
            continue;
        }
        let (row, col) = cell_to_coord::<N>(cell);
        let (goal_row, goal_col) = targets.target(label);
        let to_goal = row.abs_diff(goal_row) + col.abs_diff(goal_col);
        if to_goal == 0 {
            continue;
        }
        let to_blank = row.abs_diff(blank_row) + col.abs_diff(blank_col);
        total += (to_goal + to_blank) as u32;
    }
    total
}
