//! Round state machine: first-click mine placement, cascading reveal, flag
//! budget and win/loss detection.
//!
//! A round moves `AwaitingFirstClick -> InPlay -> {Won, Lost}`. Only
//! [`GameState::reset`] leaves a terminal phase.
//!
//! Winning requires revealing every safe cell. Flagging every mine correctly
//! does not end the round on its own.

use crate::board::Grid;
use crate::config::GameConfig;
use crate::error::Result;
use crate::rng::GameRng;
use crate::solver::Actions;
use crate::types::{ActionOutcome, Coord, FlagToggle, Intent, Phase};
use log::{debug, trace};
use serde::Serialize;
use std::collections::HashSet;

/// Play state of one round. Exclusively owns its [`Grid`].
#[derive(Clone, Debug)]
pub struct GameState {
    grid: Grid,
    rng: GameRng,
    is_first_click: bool,
    is_game_over: bool,
    did_win: bool,
    revealed_safe_cells: usize,
    total_safe_cells: usize,
    flags_placed: usize,
}

impl GameState {
    /// Take ownership of `grid`, drawing mine placement from OS entropy.
    pub fn new(grid: Grid) -> Self {
        Self::with_rng(grid, GameRng::new())
    }

    /// Take ownership of `grid` with an explicit random source.
    ///
    /// A fresh grid starts a round awaiting its first click. A grid whose
    /// mines are already placed resumes mid-round: counters are rebuilt from
    /// the cells and a revealed mine or a fully revealed board is terminal.
    pub fn with_rng(grid: Grid, rng: GameRng) -> Self {
        let size = grid.size();
        let total_safe_cells = size * size - grid.mine_count();
        let revealed_safe_cells = grid
            .cells()
            .iter()
            .filter(|c| c.is_revealed && !c.has_mine)
            .count();
        let flags_placed = grid.cells().iter().filter(|c| c.has_flag).count();
        let detonated = grid.cells().iter().any(|c| c.is_revealed && c.has_mine);
        let cleared = grid.mines_placed() && revealed_safe_cells >= total_safe_cells;

        Self {
            is_first_click: !grid.mines_placed(),
            is_game_over: detonated || cleared,
            did_win: cleared && !detonated,
            revealed_safe_cells,
            total_safe_cells,
            flags_placed,
            grid,
            rng,
        }
    }

    /// Validate `config` and set up a fresh round from it.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.size, config.mine_count)?;
        Ok(Self::with_rng(grid, GameRng::from_optional_seed(config.seed)))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        match (self.is_game_over, self.did_win, self.is_first_click) {
            (true, true, _) => Phase::Won,
            (true, false, _) => Phase::Lost,
            (false, _, true) => Phase::AwaitingFirstClick,
            (false, _, false) => Phase::InPlay,
        }
    }

    pub fn is_first_click(&self) -> bool {
        self.is_first_click
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Meaningful once [`is_game_over`](Self::is_game_over) is true.
    pub fn did_win(&self) -> bool {
        self.did_win
    }

    pub fn revealed_safe_cells(&self) -> usize {
        self.revealed_safe_cells
    }

    pub fn total_safe_cells(&self) -> usize {
        self.total_safe_cells
    }

    pub fn flags_placed(&self) -> usize {
        self.flags_placed
    }

    /// Mines not yet accounted for by a flag.
    pub fn mines_remaining(&self) -> usize {
        self.grid.mine_count().saturating_sub(self.flags_placed)
    }

    /// Reveal `(row, col)` and return every newly revealed coordinate.
    ///
    /// Returns an empty list when the round is over or the cell is already
    /// revealed or flagged. The first reveal of a round places the mines.
    /// Hitting a mine ends the round and returns just that coordinate;
    /// otherwise the zero-adjacency region around the cell cascades open.
    pub fn reveal_cell(&mut self, row: usize, col: usize) -> Result<Vec<Coord>> {
        let cell = self.grid.get_cell(row, col)?;
        if self.is_game_over || cell.is_revealed || cell.has_flag {
            return Ok(Vec::new());
        }

        if self.is_first_click {
            self.grid.place_mines(row, col, &mut self.rng)?;
            let size = self.grid.size();
            self.total_safe_cells = size * size - self.grid.mine_count();
            self.is_first_click = false;
        }

        let cell = self.grid.cell_mut((row, col));
        if cell.has_mine {
            cell.is_revealed = true;
            self.is_game_over = true;
            self.did_win = false;
            debug!("mine hit at ({}, {}), round lost", row, col);
            return Ok(vec![(row, col)]);
        }

        let revealed = self.flood_reveal(row, col);
        trace!("reveal at ({}, {}) opened {} cells", row, col, revealed.len());

        if self.revealed_safe_cells >= self.total_safe_cells {
            self.is_game_over = true;
            self.did_win = true;
            debug!("all {} safe cells revealed, round won", self.total_safe_cells);
        }
        Ok(revealed)
    }

    /// Reveal the safe cell at `(row, col)` and, across zero-count cells, the
    /// connected region around it. Never opens flagged or mined cells.
    fn flood_reveal(&mut self, row: usize, col: usize) -> Vec<Coord> {
        let mut revealed = Vec::new();
        let mut stack: Vec<Coord> = vec![(row, col)];
        let mut visited: HashSet<Coord> = HashSet::new();

        while let Some(at) = stack.pop() {
            if !visited.insert(at) {
                continue;
            }

            let cell = self.grid.cell_mut(at);
            if cell.is_revealed || cell.has_flag || cell.has_mine {
                continue;
            }
            cell.is_revealed = true;
            let expand = cell.neighbor_count == 0;
            self.revealed_safe_cells += 1;
            revealed.push(at);

            if expand {
                for &next in self.grid.neighbors(at.0, at.1) {
                    let n = self.grid.cell(next);
                    if !n.is_revealed && !n.has_flag && !n.has_mine {
                        stack.push(next);
                    }
                }
            }
        }

        revealed
    }

    /// Place or remove a flag on a hidden cell.
    ///
    /// Rejected when the round is over, the cell is revealed, or a new flag
    /// would exceed the mine count.
    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<FlagToggle> {
        let mine_count = self.grid.mine_count();
        let cell = self.grid.get_cell_mut(row, col)?;
        if self.is_game_over || cell.is_revealed {
            return Ok(FlagToggle::Rejected);
        }
        if !cell.has_flag && self.flags_placed >= mine_count {
            return Ok(FlagToggle::Rejected);
        }

        cell.has_flag = !cell.has_flag;
        if cell.has_flag {
            self.flags_placed += 1;
            Ok(FlagToggle::Placed)
        } else {
            self.flags_placed -= 1;
            Ok(FlagToggle::Removed)
        }
    }

    /// Perform `intent` on `(row, col)`.
    pub fn act(&mut self, intent: Intent, row: usize, col: usize) -> Result<ActionOutcome> {
        match intent {
            Intent::Reveal => self.reveal_cell(row, col).map(ActionOutcome::Revealed),
            Intent::Flag => self.toggle_flag(row, col).map(ActionOutcome::Flag),
        }
    }

    /// Start a new round on the same grid size with `mine_count` mines.
    pub fn reset(&mut self, mine_count: usize) -> Result<()> {
        self.grid.reset(mine_count)?;
        let size = self.grid.size();
        self.is_first_click = true;
        self.is_game_over = false;
        self.did_win = false;
        self.revealed_safe_cells = 0;
        self.flags_placed = 0;
        self.total_safe_cells = size * size - mine_count;
        debug!("new round: {}x{} with {} mines", size, size, mine_count);
        Ok(())
    }

    /// What a presentation layer may show right now.
    pub fn snapshot(&self) -> Snapshot {
        let mines = self.is_game_over.then(|| {
            self.grid
                .coords()
                .filter(|&at| self.grid.cell(at).has_mine)
                .collect()
        });
        Snapshot {
            phase: self.phase(),
            size: self.grid.size(),
            mine_count: self.grid.mine_count(),
            flags_placed: self.flags_placed,
            revealed_safe_cells: self.revealed_safe_cells,
            total_safe_cells: self.total_safe_cells,
            cells: self.grid.cells().iter().map(|c| c.visible_value()).collect(),
            mines,
        }
    }
}

impl Actions for GameState {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    fn perform(&mut self, intent: Intent, (row, col): Coord) -> Result<ActionOutcome> {
        self.act(intent, row, col)
    }
}

/// Player-visible view of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub size: usize,
    pub mine_count: usize,
    pub flags_placed: usize,
    pub revealed_safe_cells: usize,
    pub total_safe_cells: usize,
    /// Row-major [`Cell::visible_value`](crate::types::Cell::visible_value)s.
    pub cells: Vec<i8>,
    /// Mine layout, only once the round is over.
    pub mines: Option<Vec<Coord>>,
}
