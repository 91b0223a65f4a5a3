//! Board representation for N×N sliding-tile puzzles.
//!
//! Generic over the side length (`N`) and total cell count (`CELLS = N^2`).
//! The board is a flat row-major array where each cell holds a tile label
//! (1-based) or `BLANK`.

use std::fmt;

use crate::moves::Direction;

/// Label stored in the empty cell.
pub const BLANK: u8 = 0;

/// Why a tile layout could not be turned into a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The layout does not have exactly `N^2` cells.
    WrongCellCount { expected: usize, found: usize },
    /// No supported board has this many cells.
    UnsupportedSize { cells: usize },
    /// A label is larger than the largest tile on this board.
    LabelOutOfRange { label: u8, max: u8 },
    /// A label (or the blank) appears more than once.
    DuplicateLabel { label: u8 },
    /// A token in a textual layout is not a label or a blank marker.
    InvalidToken(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::WrongCellCount { expected, found } => {
                write!(f, "expected {expected} cells, found {found}")
            }
            GridError::UnsupportedSize { cells } => {
                write!(f, "{cells} cells is not a supported square board (4, 9, 16 or 25)")
            }
            GridError::LabelOutOfRange { label, max } => {
                write!(f, "tile {label} is out of range (largest tile is {max})")
            }
            GridError::DuplicateLabel { label } if *label == BLANK => {
                write!(f, "more than one blank cell")
            }
            GridError::DuplicateLabel { label } => write!(f, "tile {label} appears more than once"),
            GridError::InvalidToken(token) => write!(f, "invalid tile token '{token}'"),
        }
    }
}

impl std::error::Error for GridError {}

/// Converts (row, col) to a linear cell index.
#[inline(always)]
pub const fn coord_to_cell<const N: usize>(row: usize, col: usize) -> usize {
    row * N + col
}

/// Converts a linear cell index to (row, col).
#[inline(always)]
pub const fn cell_to_coord<const N: usize>(cell: usize) -> (usize, usize) {
    (cell / N, cell % N)
}

/// An N×N puzzle configuration.
///
/// Always valid: every label `1..CELLS` appears once and there is exactly one
/// blank. The blank's cell is cached since every move starts from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid<const N: usize, const CELLS: usize> {
    cells: [u8; CELLS],
    blank: u8,
}

pub type Grid2 = Grid<2, 4>;
pub type Grid3 = Grid<3, 9>;
pub type Grid4 = Grid<4, 16>;
pub type Grid5 = Grid<5, 25>;

impl<const N: usize, const CELLS: usize> Grid<N, CELLS> {
    /// The solved layout: tiles in row-major order, blank in the last cell.
    pub const fn goal() -> Self {
        const {
            assert!(N * N == CELLS, "CELLS must equal N^2");
            assert!(N >= 2, "board must be at least 2x2");
            assert!(CELLS <= 256, "labels must fit in a u8");
        }
        let mut cells = [BLANK; CELLS];
        let mut i = 0;
        while i < CELLS - 1 {
            cells[i] = (i + 1) as u8;
            i += 1;
        }
        Self {
            cells,
            blank: (CELLS - 1) as u8,
        }
    }

    /// Validates a row-major layout.
    pub fn from_cells(cells: [u8; CELLS]) -> Result<Self, GridError> {
        // reuse the compile-time size checks
        let _ = Self::goal();

        let max = (CELLS - 1) as u8;
        let mut seen = [false; CELLS];
        let mut blank = 0u8;
        for (cell, &label) in cells.iter().enumerate() {
            if label > max {
                return Err(GridError::LabelOutOfRange { label, max });
            }
            if seen[label as usize] {
                return Err(GridError::DuplicateLabel { label });
            }
            seen[label as usize] = true;
            if label == BLANK {
                blank = cell as u8;
            }
        }

        // CELLS distinct labels from 0..CELLS means the blank is present
        Ok(Self { cells, blank })
    }

    /// Validates a layout given as a slice of any length.
    pub fn from_slice(cells: &[u8]) -> Result<Self, GridError> {
        let cells: [u8; CELLS] = cells.try_into().map_err(|_| GridError::WrongCellCount {
            expected: CELLS,
            found: cells.len(),
        })?;
        Self::from_cells(cells)
    }

    /// Validates a layout given row by row.
    pub fn from_rows(rows: [[u8; N]; N]) -> Result<Self, GridError> {
        let flat: Vec<u8> = rows.iter().flatten().copied().collect();
        Self::from_slice(&flat)
    }

    /// Parses a textual layout, see [`tokenize`].
    pub fn parse(text: &str) -> Result<Self, GridError> {
        Self::from_slice(&tokenize(text)?)
    }

    /// The row-major cell array.
    #[inline]
    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> u8 {
        self.cells[coord_to_cell::<N>(row, col)]
    }

    /// Linear index of the blank.
    #[inline(always)]
    pub fn blank_cell(&self) -> usize {
        self.blank as usize
    }

    /// (row, col) of the blank.
    #[inline(always)]
    pub fn blank(&self) -> (usize, usize) {
        cell_to_coord::<N>(self.blank_cell())
    }

    /// (row, col) of a tile, or `None` for labels not on this board.
    pub fn position_of(&self, label: u8) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&cell| cell == label)
            .map(cell_to_coord::<N>)
    }

    pub fn is_goal(&self) -> bool {
        *self == Self::goal()
    }

    /// Cell the blank would move to, if it stays on the board.
    #[inline(always)]
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let (row, col) = self.blank();
        let (dr, dc) = direction.offset();
        let new_row = row as i32 + dr;
        let new_col = col as i32 + dc;
        if !(0..N as i32).contains(&new_row) || !(0..N as i32).contains(&new_col) {
            return None;
        }
        Some(coord_to_cell::<N>(new_row as usize, new_col as usize))
    }

    /// Moves the blank one step, returning the new layout.
    ///
    /// Returns `None` if the blank would leave the board.
    pub fn try_move(&self, direction: Direction) -> Option<Self> {
        let target = self.neighbor(direction)?;
        let mut next = *self;
        next.cells.swap(self.blank_cell(), target);
        next.blank = target as u8;
        Some(next)
    }

    /// Applies a sequence of blank moves, failing on the first illegal one.
    pub fn apply_moves(&self, moves: &[Direction]) -> Option<Self> {
        moves
            .iter()
            .try_fold(*self, |grid, &direction| grid.try_move(direction))
    }

    /// Slides the tile `label` into the blank.
    ///
    /// # Panics
    ///
    /// Panics if the tile is not orthogonally adjacent to the blank. Callers
    /// must check adjacency first or go through [`Grid::try_move`].
    pub fn slide_tile(&self, label: u8) -> Self {
        let (tile_row, tile_col) = match self.position_of(label) {
            Some(position) if label != BLANK => position,
            _ => panic!("tile {label} is not on the board"),
        };
        let (blank_row, blank_col) = self.blank();
        assert!(
            tile_row.abs_diff(blank_row) + tile_col.abs_diff(blank_col) == 1,
            "tile {label} is not adjacent to the blank"
        );

        let mut next = *self;
        let tile_cell = coord_to_cell::<N>(tile_row, tile_col);
        next.cells.swap(self.blank_cell(), tile_cell);
        next.blank = tile_cell as u8;
        next
    }

    /// Number of tile pairs (blank excluded) that appear in the wrong
    /// relative order when the board is read row by row.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.cells.iter().copied().filter(|&t| t != BLANK).collect();
        let mut count = 0;
        for (i, &a) in tiles.iter().enumerate() {
            count += tiles[i + 1..].iter().filter(|&&b| a > b).count();
        }
        count
    }

    /// Standard permutation-parity solvability test against [`Grid::goal`].
    ///
    /// For odd `N` a vertical move shifts a tile past an even number of
    /// others, so the inversion count parity is invariant and must be even.
    /// For even `N` the invariant is the parity of inversions plus the
    /// blank's row, which must match the goal's (`N - 1`).
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if N % 2 == 1 {
            inversions % 2 == 0
        } else {
            let (blank_row, _) = self.blank();
            (inversions + blank_row) % 2 == (N - 1) % 2
        }
    }

    /// One-line layout, rows separated by `/`, blank as `_`.
    ///
    /// Parses back with [`Grid::parse`].
    pub fn to_compact(&self) -> String {
        self.cells
            .chunks(N)
            .map(|row| {
                row.iter()
                    .map(|&label| {
                        if label == BLANK {
                            "_".to_string()
                        } else {
                            label.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Formats the board as right-aligned rows, blank shown as `_`.
impl<const N: usize, const CELLS: usize> fmt::Display for Grid<N, CELLS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (CELLS - 1).to_string().len();
        for (row_index, row) in self.cells.chunks(N).enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            for (col, &label) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if label == BLANK {
                    write!(f, "{:>width$}", "_")?;
                } else {
                    write!(f, "{label:>width$}")?;
                }
            }
        }
        Ok(())
    }
}

/// Splits a textual layout into labels.
///
/// Labels may be separated by whitespace, commas, `/` or newlines. The blank
/// is written `_` or `0`.
pub fn tokenize(text: &str) -> Result<Vec<u8>, GridError> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter(|token| !token.is_empty())
        .map(|token| match token {
            "_" => Ok(BLANK),
            _ => token
                .parse::<u8>()
                .map_err(|_| GridError::InvalidToken(token.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_layout_4x4() {
        let goal = Grid4::goal();
        assert_eq!(goal.tile(0, 0), 1);
        assert_eq!(goal.tile(3, 2), 15);
        assert_eq!(goal.blank(), (3, 3));
        assert!(goal.is_goal());
    }

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for cell in 0..16 {
            let (row, col) = cell_to_coord::<4>(cell);
            assert_eq!(coord_to_cell::<4>(row, col), cell, "Roundtrip failed for {cell}");
        }
    }

    #[test]
    fn test_from_cells_rejects_duplicates() {
        let err = Grid3::from_cells([1, 2, 3, 4, 5, 6, 7, 7, 0]).unwrap_err();
        assert_eq!(err, GridError::DuplicateLabel { label: 7 });

        let err = Grid3::from_cells([1, 2, 3, 4, 5, 6, 7, 0, 0]).unwrap_err();
        assert_eq!(err, GridError::DuplicateLabel { label: 0 });
        assert_eq!(err.to_string(), "more than one blank cell");
    }

    #[test]
    fn test_from_cells_rejects_out_of_range() {
        let err = Grid2::from_cells([1, 2, 4, 0]).unwrap_err();
        assert_eq!(err, GridError::LabelOutOfRange { label: 4, max: 3 });
    }

    #[test]
    fn test_from_slice_rejects_wrong_size() {
        let err = Grid3::from_slice(&[1, 2, 3, 0]).unwrap_err();
        assert_eq!(err, GridError::WrongCellCount { expected: 9, found: 4 });
    }

    #[test]
    fn test_parse_accepts_separators_and_blank_marker() {
        let grid = Grid3::parse("1,2,3/4 5 6\n7 _ 8").unwrap();
        assert_eq!(grid.blank(), (2, 1));
        assert_eq!(grid.tile(2, 2), 8);

        let err = Grid3::parse("1 2 3 4 5 6 7 8 x").unwrap_err();
        assert_eq!(err, GridError::InvalidToken("x".to_string()));
    }

    #[test]
    fn test_compact_roundtrip() {
        let grid = Grid4::from_rows([[4, 1, 2, 3], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]])
            .unwrap();
        let text = grid.to_compact();
        assert_eq!(text, "4,1,2,3/5,6,7,8/9,10,11,12/13,14,15,_");
        assert_eq!(Grid4::parse(&text).unwrap(), grid);
    }

    #[test]
    fn test_try_move_at_edges() {
        let goal = Grid4::goal();
        assert!(goal.try_move(Direction::Down).is_none());
        assert!(goal.try_move(Direction::Right).is_none());

        let moved = goal.try_move(Direction::Left).unwrap();
        assert_eq!(moved.blank(), (3, 2));
        assert_eq!(moved.tile(3, 3), 15);
        assert_eq!(moved.try_move(Direction::Right), Some(goal));
    }

    #[test]
    fn test_slide_tile_matches_blank_move() {
        let goal = Grid3::goal();
        assert_eq!(goal.slide_tile(8), goal.try_move(Direction::Left).unwrap());
        assert_eq!(goal.slide_tile(6), goal.try_move(Direction::Up).unwrap());
    }

    #[test]
    #[should_panic(expected = "not adjacent")]
    fn test_slide_tile_rejects_distant_tile() {
        Grid3::goal().slide_tile(1);
    }

    #[test]
    fn test_solvability_parity() {
        assert!(Grid4::goal().is_solvable());
        assert!(Grid3::goal().is_solvable());

        // swapping two tiles flips parity
        let swapped = Grid4::from_rows([[2, 1, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 0]])
            .unwrap();
        assert!(!swapped.is_solvable());

        let swapped = Grid3::from_cells([1, 2, 3, 4, 5, 6, 8, 7, 0]).unwrap();
        assert!(!swapped.is_solvable());

        // moving the blank keeps it solvable
        let moved = Grid4::goal()
            .apply_moves(&[Direction::Up, Direction::Left, Direction::Up])
            .unwrap();
        assert!(moved.is_solvable());
    }

    #[test]
    fn test_display_marks_blank() {
        let grid = Grid3::goal().try_move(Direction::Up).unwrap();
        insta::assert_snapshot!(grid.to_string(), @r"
        1 2 3
        4 5 _
        7 8 6
        ");
    }

    #[test]
    fn test_display_aligns_columns() {
        let grid = Grid4::goal().try_move(Direction::Up).unwrap();
        let lines: Vec<String> = grid.to_string().lines().map(str::to_string).collect();
        assert_eq!(lines[0], " 1  2  3  4");
        assert_eq!(lines[2], " 9 10 11  _");
        assert_eq!(lines[3], "13 14 15 12");
    }
}
