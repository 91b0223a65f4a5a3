//! Blank-cell move directions.
//!
//! Directions always describe the motion of the *blank*, not of the tile it
//! swaps with: `Up` means the blank moves one row towards row 0.

use std::fmt;

/// A single step of the blank cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

/// Canonical generation order.
///
/// Child order decides tie-breaking in both searches, so this order is part
/// of the observable behavior and must not change.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Right,
    Direction::Down,
];

impl Direction {
    /// Row and column offset applied to the blank.
    #[inline(always)]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    /// The move that undoes this one.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// Single-letter code used in compact move listings.
    pub const fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Down => 'D',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// Formats a move sequence as letters, e.g. `"LLU"`.
pub fn format_moves(moves: &[Direction]) -> String {
    moves.iter().map(|direction| direction.letter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for direction in DIRECTIONS {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        for direction in DIRECTIONS {
            let (dr, dc) = direction.offset();
            let (or, oc) = direction.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0), "{direction} does not cancel");
        }
    }

    #[test]
    fn test_format_moves() {
        let moves = [Direction::Left, Direction::Left, Direction::Up];
        assert_eq!(format_moves(&moves), "LLU");
        assert_eq!(format_moves(&[]), "");
    }
}
