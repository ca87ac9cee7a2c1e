//! Core data types for the round engine and the solver.
//!
//! Coordinates are `(row, col)` pairs and every grid is stored row-major:
//! `cells[row * size + col]`.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `(row, col)` position on the grid.
pub type Coord = (usize, usize);

/// State of one grid position.
///
/// `neighbor_count` only means something once mines have been placed. A cell
/// that is both mined and revealed marks the detonation that lost the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub has_flag: bool,
    pub is_revealed: bool,
    pub neighbor_count: u8,
}

impl Cell {
    /// Neither revealed nor flagged.
    #[inline(always)]
    pub fn is_untouched(&self) -> bool {
        !self.is_revealed && !self.has_flag
    }

    /// Value shown to a player: -1 hidden, -2 flagged, 0-8 revealed number,
    /// 9 revealed mine.
    pub fn visible_value(&self) -> i8 {
        match (self.is_revealed, self.has_flag, self.has_mine) {
            (true, _, true) => 9,
            (true, _, false) => self.neighbor_count as i8,
            (false, true, _) => -2,
            (false, false, _) => -1,
        }
    }
}

/// Pre-computed neighbor cache for all cells of a square grid.
///
/// Stores the Moore neighbors (clipped to grid bounds) for every cell, indexed
/// by `row * size + col`. Each entry is a slice of `(row, col)` pairs.
#[derive(Clone, Debug)]
pub struct NeighborCache {
    pub size: usize,
    /// Flat storage of all neighbor pairs.
    data: Vec<Coord>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a `size`×`size` grid.
    pub fn new(size: usize) -> Self {
        let total = size * size;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..size {
            for col in 0..size {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < size as i64 && nc >= 0 && nc < size as i64 {
                            data.push((nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self { size, data, offsets }
    }

    /// Get the pre-computed neighbors for `(row, col)`.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> &[Coord] {
        let idx = row * self.size + col;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}

/// Strength of the automated opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Reveals a random untouched cell.
    Easy,
    /// Counting rules, falling back to Easy.
    Medium,
    /// Counting rules plus the 1-2-1 pattern, falling back to Easy.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown solver difficulty '{other}'"
            ))),
        }
    }
}

/// What an action means to do with its target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Reveal,
    Flag,
}

/// One step the solver decided on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    RevealAt(Coord),
    FlagAt(Coord),
    Pass,
}

impl Decision {
    /// The intent and target of an actionable decision, `None` for `Pass`.
    pub fn action(&self) -> Option<(Intent, Coord)> {
        match *self {
            Decision::RevealAt(at) => Some((Intent::Reveal, at)),
            Decision::FlagAt(at) => Some((Intent::Flag, at)),
            Decision::Pass => None,
        }
    }
}

/// Result of a flag toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagToggle {
    Placed,
    Removed,
    Rejected,
}

impl FlagToggle {
    /// +1 placed, -1 removed, 0 rejected.
    pub fn delta(self) -> i8 {
        match self {
            FlagToggle::Placed => 1,
            FlagToggle::Removed => -1,
            FlagToggle::Rejected => 0,
        }
    }
}

/// Where a round is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingFirstClick,
    InPlay,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// What an intent-tagged action did to the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Cells newly revealed, in reveal order. A single mined cell on a loss.
    Revealed(Vec<Coord>),
    Flag(FlagToggle),
}

impl ActionOutcome {
    /// True when the action left the board unchanged.
    pub fn is_noop(&self) -> bool {
        match self {
            ActionOutcome::Revealed(cells) => cells.is_empty(),
            ActionOutcome::Flag(toggle) => *toggle == FlagToggle::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_cache_corners() {
        let nc = NeighborCache::new(5);
        // Corner (0,0) should have 3 neighbors
        assert_eq!(nc.get(0, 0).len(), 3);
        // Edge (0,2) should have 5 neighbors
        assert_eq!(nc.get(0, 2).len(), 5);
        // Center (2,2) should have 8 neighbors
        assert_eq!(nc.get(2, 2).len(), 8);
        assert_eq!(nc.get(4, 4).len(), 3);
    }

    #[test]
    fn test_neighbor_cache_adjacency() {
        let nc = NeighborCache::new(10);
        for &(nr, nc_) in nc.get(5, 5) {
            assert!(nr < 10 && nc_ < 10);
            let dr = nr as i64 - 5;
            let dc = nc_ as i64 - 5;
            assert!(dr.abs() <= 1 && dc.abs() <= 1);
            assert!(dr != 0 || dc != 0);
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let nc = NeighborCache::new(1);
        assert!(nc.get(0, 0).is_empty());
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "Insane".parse::<Difficulty>(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_visible_value() {
        let mut cell = Cell::default();
        assert_eq!(cell.visible_value(), -1);
        cell.has_flag = true;
        assert_eq!(cell.visible_value(), -2);
        cell.has_flag = false;
        cell.is_revealed = true;
        cell.neighbor_count = 3;
        assert_eq!(cell.visible_value(), 3);
        cell.has_mine = true;
        assert_eq!(cell.visible_value(), 9);
    }

    #[test]
    fn test_flag_toggle_delta() {
        assert_eq!(FlagToggle::Placed.delta(), 1);
        assert_eq!(FlagToggle::Removed.delta(), -1);
        assert_eq!(FlagToggle::Rejected.delta(), 0);
    }
}
