//! The 1-2-1 pattern rule.
//!
//! Three revealed cells in a line showing 1, 2, 1 next to a strip of three
//! hidden cells: the two outer cells of the strip are mines and the middle
//! one is safe. Lines are checked horizontally (row-major) first, then
//! vertically (column-major).

use crate::board::Grid;
use crate::types::{Coord, Decision};
use log::trace;

const PATTERN: [u8; 3] = [1, 2, 1];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Map a `(line, position along the line)` pair to a grid coordinate.
    #[inline(always)]
    fn coord(self, line: usize, along: usize) -> Coord {
        match self {
            Orientation::Horizontal => (line, along),
            Orientation::Vertical => (along, line),
        }
    }
}

/// Decisions from the first 1-2-1 match that still has something to do, or
/// an empty list when no match applies.
///
/// Outer strip cells already flagged and a flagged middle cell are left
/// alone; a match whose strip needs nothing is skipped.
pub fn one_two_one(grid: &Grid) -> Vec<Decision> {
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let decisions = scan(grid, orientation);
        if !decisions.is_empty() {
            return decisions;
        }
    }
    Vec::new()
}

fn scan(grid: &Grid, orientation: Orientation) -> Vec<Decision> {
    let size = grid.size();
    if size < 3 {
        return Vec::new();
    }

    for line in 0..size {
        for mid in 1..size - 1 {
            let triple = [mid - 1, mid, mid + 1].map(|along| orientation.coord(line, along));
            if !is_pattern(grid, &triple) {
                continue;
            }

            for strip_line in [line.checked_sub(1), Some(line + 1)].into_iter().flatten() {
                if strip_line >= size {
                    continue;
                }
                let strip = [mid - 1, mid, mid + 1].map(|along| orientation.coord(strip_line, along));
                if strip.iter().any(|&at| grid.cell(at).is_revealed) {
                    continue;
                }

                let decisions = strip_decisions(grid, &strip);
                if !decisions.is_empty() {
                    trace!(
                        "1-2-1 {:?} at {:?}: mines {:?} {:?}, safe {:?}",
                        orientation,
                        triple[1],
                        strip[0],
                        strip[2],
                        strip[1]
                    );
                    return decisions;
                }
            }
        }
    }
    Vec::new()
}

fn is_pattern(grid: &Grid, triple: &[Coord; 3]) -> bool {
    triple.iter().zip(PATTERN).all(|(&at, expected)| {
        let cell = grid.cell(at);
        cell.is_revealed && !cell.has_mine && cell.neighbor_count == expected
    })
}

fn strip_decisions(grid: &Grid, strip: &[Coord; 3]) -> Vec<Decision> {
    let mut decisions = Vec::with_capacity(3);
    for &mine in [strip[0], strip[2]].iter() {
        if !grid.cell(mine).has_flag {
            decisions.push(Decision::FlagAt(mine));
        }
    }
    if !grid.cell(strip[1]).has_flag {
        decisions.push(Decision::RevealAt(strip[1]));
    }
    decisions
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 with mines at (1,1) and (1,3); rows 2-4 revealed, row 2 reads
    /// 1 1 2 1 1.
    fn horizontal_fixture() -> Grid {
        let mut grid = Grid::with_mines(5, &[(1, 1), (1, 3)]).unwrap();
        let open: Vec<Coord> = (2..5).flat_map(|r| (0..5).map(move |c| (r, c))).collect();
        grid.mark_revealed(&open);
        grid
    }

    /// The horizontal fixture transposed.
    fn vertical_fixture() -> Grid {
        let mut grid = Grid::with_mines(5, &[(1, 1), (3, 1)]).unwrap();
        let open: Vec<Coord> = (0..5).flat_map(|r| (2..5).map(move |c| (r, c))).collect();
        grid.mark_revealed(&open);
        grid
    }

    #[test]
    fn test_horizontal_match() {
        let grid = horizontal_fixture();
        assert_eq!(
            one_two_one(&grid),
            vec![
                Decision::FlagAt((1, 1)),
                Decision::FlagAt((1, 3)),
                Decision::RevealAt((1, 2)),
            ]
        );
    }

    #[test]
    fn test_vertical_match() {
        let grid = vertical_fixture();
        assert_eq!(
            one_two_one(&grid),
            vec![
                Decision::FlagAt((1, 1)),
                Decision::FlagAt((3, 1)),
                Decision::RevealAt((2, 1)),
            ]
        );
    }

    #[test]
    fn test_partially_flagged_strip() {
        let mut grid = horizontal_fixture();
        grid.get_cell_mut(1, 1).unwrap().has_flag = true;
        assert_eq!(
            one_two_one(&grid),
            vec![Decision::FlagAt((1, 3)), Decision::RevealAt((1, 2))]
        );

        grid.get_cell_mut(1, 3).unwrap().has_flag = true;
        grid.get_cell_mut(1, 2).unwrap().has_flag = true;
        assert!(one_two_one(&grid).is_empty());
    }

    #[test]
    fn test_strip_with_revealed_cell_is_ignored() {
        let mut grid = horizontal_fixture();
        grid.mark_revealed(&[(1, 2)]);
        assert!(one_two_one(&grid).is_empty());
    }

    #[test]
    fn test_small_grids() {
        let mut grid = Grid::with_mines(2, &[(0, 0)]).unwrap();
        grid.mark_revealed(&[(1, 0), (1, 1)]);
        assert!(one_two_one(&grid).is_empty());
    }
}
