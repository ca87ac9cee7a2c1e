//! The grid: cell storage, mine placement and neighbor counts.
//!
//! Mines are placed lazily, on the first reveal of a round, so that the
//! clicked cell and its whole Moore neighborhood are guaranteed mine-free.
//! The grid knows nothing about turns, the flag budget or winning.

use crate::config::validate_dimensions;
use crate::error::{EngineError, Result};
use crate::rng::GameRng;
use crate::types::{Cell, Coord, NeighborCache};
use log::debug;

/// A square matrix of cells plus the number of mines it holds.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    neighbors: NeighborCache,
    mines_placed: bool,
}

impl Grid {
    /// Build an all-hidden, mine-free grid. Mines are placed later by
    /// [`Grid::place_mines`].
    pub fn new(size: usize, mine_count: usize) -> Result<Self> {
        validate_dimensions(size, mine_count)?;
        Ok(Self {
            size,
            mine_count,
            cells: vec![Cell::default(); size * size],
            neighbors: NeighborCache::new(size),
            mines_placed: false,
        })
    }

    /// Build a grid with a fixed mine layout and correct neighbor counts.
    ///
    /// Duplicate coordinates count once. Useful for replaying a known board.
    pub fn with_mines(size: usize, mines: &[Coord]) -> Result<Self> {
        let mut grid = Self::new(size, 0)?;
        for &(row, col) in mines {
            grid.check_bounds(row, col)?;
            grid.cells[row * size + col].has_mine = true;
        }
        grid.mine_count = grid.cells.iter().filter(|c| c.has_mine).count();
        grid.compute_adjacent_mines();
        grid.mines_placed = true;
        Ok(grid)
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Whether this round's mines are already on the board.
    #[inline(always)]
    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// Every coordinate, row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| (row, col)))
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Randomly place `mine_count` mines outside the safe zone around
    /// `(safe_row, safe_col)`, then recompute all neighbor counts.
    ///
    /// The safe zone is the clicked cell plus its Moore neighbors. Every cell
    /// outside it is equally likely to receive a mine.
    pub fn place_mines(&mut self, safe_row: usize, safe_col: usize, rng: &mut GameRng) -> Result<()> {
        self.check_bounds(safe_row, safe_col)?;
        if self.mines_placed {
            return Err(EngineError::PreconditionViolation(
                "mines are already placed for this round",
            ));
        }

        let in_safe_zone = |row: usize, col: usize| {
            row.abs_diff(safe_row) <= 1 && col.abs_diff(safe_col) <= 1
        };
        let eligible: Vec<Coord> = self
            .coords()
            .filter(|&(row, col)| !in_safe_zone(row, col))
            .collect();

        if self.mine_count > eligible.len() {
            return Err(EngineError::InvalidConfig(format!(
                "{} mines do not fit outside the safe zone ({} eligible cells)",
                self.mine_count,
                eligible.len()
            )));
        }

        for idx in rng.sample(eligible.len(), self.mine_count) {
            let (row, col) = eligible[idx];
            self.cells[row * self.size + col].has_mine = true;
        }
        self.compute_adjacent_mines();
        self.mines_placed = true;

        debug!(
            "placed {} mines on {}x{} grid, safe zone around ({}, {})",
            self.mine_count, self.size, self.size, safe_row, safe_col
        );
        Ok(())
    }

    /// In-bounds Moore neighbors of `(row, col)`: 3 for corners, 5 for edges,
    /// 8 inside.
    #[inline(always)]
    pub fn neighbors(&self, row: usize, col: usize) -> &[Coord] {
        self.neighbors.get(row, col)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell> {
        self.check_bounds(row, col)?;
        Ok(&self.cells[row * self.size + col])
    }

    pub(crate) fn get_cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell> {
        self.check_bounds(row, col)?;
        Ok(&mut self.cells[row * self.size + col])
    }

    /// Bounds are checked by the caller.
    #[inline(always)]
    pub(crate) fn cell(&self, (row, col): Coord) -> &Cell {
        &self.cells[row * self.size + col]
    }

    #[inline(always)]
    pub(crate) fn cell_mut(&mut self, (row, col): Coord) -> &mut Cell {
        &mut self.cells[row * self.size + col]
    }

    /// Coordinates that are neither revealed nor flagged.
    pub fn untouched_cells(&self) -> Result<Vec<Coord>> {
        let untouched: Vec<Coord> = self
            .coords()
            .filter(|&at| self.cell(at).is_untouched())
            .collect();
        if untouched.is_empty() {
            return Err(EngineError::PreconditionViolation(
                "no untouched cells remain",
            ));
        }
        Ok(untouched)
    }

    pub fn is_flagged(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.get_cell(row, col)?.has_flag)
    }

    /// How many of `(row, col)`'s neighbors hold a mine.
    pub fn count_adjacent_mines(&self, row: usize, col: usize) -> u8 {
        self.neighbors(row, col)
            .iter()
            .filter(|&&at| self.cell(at).has_mine)
            .count() as u8
    }

    /// Recompute `neighbor_count` for every cell.
    pub fn compute_adjacent_mines(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                let count = self.count_adjacent_mines(row, col);
                self.cells[row * self.size + col].neighbor_count = count;
            }
        }
    }

    /// Replace every cell with a fresh one and take a new mine count. Mines
    /// are placed again on the next first reveal.
    pub fn reset(&mut self, mine_count: usize) -> Result<()> {
        validate_dimensions(self.size, mine_count)?;
        self.mine_count = mine_count;
        self.cells = vec![Cell::default(); self.size * self.size];
        self.mines_placed = false;
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.size || col >= self.size {
            return Err(EngineError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Reveal cells directly, bypassing the round rules. Test fixtures only.
    #[cfg(test)]
    pub(crate) fn mark_revealed(&mut self, coords: &[Coord]) {
        for &at in coords {
            self.cell_mut(at).is_revealed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(Grid::new(0, 0), Err(EngineError::InvalidConfig(_))));
        assert!(matches!(Grid::new(4, 17), Err(EngineError::InvalidConfig(_))));
        let grid = Grid::new(4, 16).unwrap();
        assert_eq!(grid.size(), 4);
        assert!(!grid.mines_placed());
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_place_mines_count() {
        let mut rng = GameRng::from_seed(42);
        let mut grid = Grid::new(10, 20).unwrap();
        grid.place_mines(5, 5, &mut rng).unwrap();
        assert_eq!(grid.cells().iter().filter(|c| c.has_mine).count(), 20);
        assert!(grid.mines_placed());
    }

    #[test]
    fn test_place_mines_safe_zone() {
        for seed in 0..20 {
            let mut rng = GameRng::from_seed(seed);
            let mut grid = Grid::new(10, 20).unwrap();
            grid.place_mines(0, 9, &mut rng).unwrap();

            assert!(!grid.get_cell(0, 9).unwrap().has_mine);
            for &(r, c) in grid.neighbors(0, 9) {
                assert!(!grid.get_cell(r, c).unwrap().has_mine, "mine in safe zone at ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_place_mines_fills_everything_outside_safe_zone() {
        let mut rng = GameRng::from_seed(3);
        let mut grid = Grid::new(10, 91).unwrap();
        grid.place_mines(4, 4, &mut rng).unwrap();
        for (r, c) in grid.coords() {
            let safe = r.abs_diff(4) <= 1 && c.abs_diff(4) <= 1;
            assert_eq!(grid.get_cell(r, c).unwrap().has_mine, !safe);
        }
    }

    #[test]
    fn test_place_mines_too_many_for_safe_zone() {
        let mut rng = GameRng::from_seed(1);
        let mut grid = Grid::new(3, 1).unwrap();
        // The safe zone around the center covers the whole 3x3 grid.
        assert!(matches!(
            grid.place_mines(1, 1, &mut rng),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(!grid.mines_placed());
    }

    #[test]
    fn test_place_mines_twice_is_rejected() {
        let mut rng = GameRng::from_seed(1);
        let mut grid = Grid::new(5, 3).unwrap();
        grid.place_mines(0, 0, &mut rng).unwrap();
        assert!(matches!(
            grid.place_mines(0, 0, &mut rng),
            Err(EngineError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_neighbor_counts_match_layout() {
        let mut rng = GameRng::from_seed(99);
        let mut grid = Grid::new(10, 30).unwrap();
        grid.place_mines(2, 7, &mut rng).unwrap();
        for (r, c) in grid.coords() {
            let expected = grid
                .neighbors(r, c)
                .iter()
                .filter(|&&(nr, nc)| grid.get_cell(nr, nc).unwrap().has_mine)
                .count() as u8;
            assert_eq!(grid.get_cell(r, c).unwrap().neighbor_count, expected);
        }
    }

    #[test]
    fn test_with_mines_center() {
        let grid = Grid::with_mines(3, &[(1, 1)]).unwrap();
        assert_eq!(grid.mine_count(), 1);
        // All 8 neighbors should be 1
        for &(r, c) in grid.neighbors(1, 1) {
            assert_eq!(grid.get_cell(r, c).unwrap().neighbor_count, 1);
        }
        assert_eq!(grid.get_cell(1, 1).unwrap().neighbor_count, 0);
    }

    #[test]
    fn test_with_mines_corner() {
        let grid = Grid::with_mines(3, &[(0, 0), (0, 0)]).unwrap();
        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.get_cell(0, 1).unwrap().neighbor_count, 1);
        assert_eq!(grid.get_cell(1, 0).unwrap().neighbor_count, 1);
        assert_eq!(grid.get_cell(1, 1).unwrap().neighbor_count, 1);
        assert_eq!(grid.get_cell(0, 2).unwrap().neighbor_count, 0);
        assert_eq!(grid.get_cell(2, 2).unwrap().neighbor_count, 0);
    }

    #[test]
    fn test_get_cell_out_of_bounds() {
        let grid = Grid::new(4, 2).unwrap();
        assert_eq!(
            grid.get_cell(4, 0),
            Err(EngineError::OutOfBounds { row: 4, col: 0, size: 4 })
        );
        assert!(grid.get_cell(0, 4).is_err());
        assert!(grid.get_cell(3, 3).is_ok());
    }

    #[test]
    fn test_untouched_cells() {
        let mut grid = Grid::with_mines(2, &[(0, 0)]).unwrap();
        assert_eq!(grid.untouched_cells().unwrap().len(), 4);

        grid.get_cell_mut(0, 0).unwrap().has_flag = true;
        grid.mark_revealed(&[(0, 1), (1, 0)]);
        assert_eq!(grid.untouched_cells().unwrap(), vec![(1, 1)]);
        assert!(grid.is_flagged(0, 0).unwrap());

        grid.mark_revealed(&[(1, 1)]);
        assert!(matches!(
            grid.untouched_cells(),
            Err(EngineError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_reset_clears_board() {
        let mut rng = GameRng::from_seed(5);
        let mut grid = Grid::new(6, 5).unwrap();
        grid.place_mines(0, 0, &mut rng).unwrap();
        grid.mark_revealed(&[(0, 0)]);

        grid.reset(8).unwrap();
        assert_eq!(grid.mine_count(), 8);
        assert!(!grid.mines_placed());
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));

        assert!(matches!(grid.reset(37), Err(EngineError::InvalidConfig(_))));
        assert_eq!(grid.mine_count(), 8);
    }
}
