//! A round played by a person against the solver, taking turns.
//!
//! Each successful player reveal hands the turn to the solver, which plays one
//! decision cycle and hands it back. Whoever detonates a mine loses; if the
//! board is cleared, whoever made the final reveal wins. Flags never cost a
//! turn. Without a solver the duel is plain solo play.

use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::game::GameState;
use crate::rng::GameRng;
use crate::solver::Solver;
use crate::types::{Coord, Decision, FlagToggle};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Solver,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Solver,
            Side::Solver => Side::Player,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Duel {
    game: GameState,
    solver: Option<Solver>,
    turn: Side,
    last_actor: Option<Side>,
}

impl Duel {
    pub fn new(game: GameState, solver: Option<Solver>) -> Self {
        Self {
            game,
            solver,
            turn: Side::Player,
            last_actor: None,
        }
    }

    /// Set up a round and, when `config.difficulty` is set, its opponent.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        let game = GameState::from_config(config)?;
        // Keep the solver's guesses independent of the mine layout stream.
        let solver_seed = config.seed.map(|seed| seed.wrapping_add(1));
        let solver = config
            .difficulty
            .map(|d| Solver::with_rng(d, GameRng::from_optional_seed(solver_seed)));
        Ok(Self::new(game, solver))
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn solver(&self) -> Option<&Solver> {
        self.solver.as_ref()
    }

    /// Whose move it is.
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// The side that won, once the round is over.
    pub fn winner(&self) -> Option<Side> {
        if !self.game.is_game_over() {
            return None;
        }
        let actor = self.last_actor?;
        Some(if self.game.did_win() { actor } else { actor.other() })
    }

    pub fn player_reveal(&mut self, row: usize, col: usize) -> Result<Vec<Coord>> {
        if self.turn != Side::Player {
            return Err(EngineError::PreconditionViolation("it is the solver's turn"));
        }
        let revealed = self.game.reveal_cell(row, col)?;
        if !revealed.is_empty() {
            self.last_actor = Some(Side::Player);
            if self.solver.is_some() && !self.game.is_game_over() {
                self.turn = Side::Solver;
            }
        }
        Ok(revealed)
    }

    pub fn player_flag(&mut self, row: usize, col: usize) -> Result<FlagToggle> {
        self.game.toggle_flag(row, col)
    }

    /// Let the solver play its turn.
    pub fn solver_turn(&mut self) -> Result<Vec<Decision>> {
        if self.turn != Side::Solver {
            return Err(EngineError::PreconditionViolation("it is the player's turn"));
        }
        let solver = self
            .solver
            .as_mut()
            .ok_or(EngineError::PreconditionViolation("no solver in this round"))?;
        let applied = solver.play_turn(&mut self.game)?;
        self.last_actor = Some(Side::Solver);
        self.turn = Side::Player;
        if let Some(winner) = self.winner() {
            debug!("round over, {:?} wins", winner);
        }
        Ok(applied)
    }

    /// New round with `mine_count` mines; the player moves first.
    pub fn reset(&mut self, mine_count: usize) -> Result<()> {
        self.game.reset(mine_count)?;
        self.turn = Side::Player;
        self.last_actor = None;
        Ok(())
    }
}
