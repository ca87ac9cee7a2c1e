//! Rule-based automated player.
//!
//! The solver sees only what a human would (revealed numbers and current
//! flags) and acts only through the [`Actions`] seam. Each call to
//! [`Solver::play_turn`] is one decision cycle:
//! - Easy: reveal a random untouched cell
//! - Medium: counting rules, else Easy
//! - Hard: counting rules, else the 1-2-1 pattern, else Easy
//!
//! Scans are row-major and the first cell (or pattern match) with at least one
//! effective action wins the turn: all of its actions are applied and the
//! turn ends.

use crate::board::Grid;
use crate::error::{EngineError, Result};
use crate::pattern;
use crate::rng::GameRng;
use crate::types::{ActionOutcome, Coord, Decision, Difficulty, Intent};
use log::{debug, trace, warn};

/// What the solver may do to a round: read the grid and act with an explicit
/// intent.
pub trait Actions {
    fn grid(&self) -> &Grid;

    fn is_game_over(&self) -> bool;

    /// Reveal or flag `at`, with exactly the semantics of a player action.
    fn perform(&mut self, intent: Intent, at: Coord) -> Result<ActionOutcome>;
}

/// Automated opponent of a fixed difficulty.
///
/// Holds no board state between turns; the random source is only consulted
/// for Easy guesses.
#[derive(Clone, Debug)]
pub struct Solver {
    difficulty: Difficulty,
    rng: GameRng,
}

impl Solver {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, GameRng::new())
    }

    pub fn with_rng(difficulty: Difficulty, rng: GameRng) -> Self {
        Self { difficulty, rng }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Deterministic deductions for this difficulty on `grid`.
    ///
    /// Returns `[Decision::Pass]` when no rule applies; the random guess that
    /// follows a pass is made by [`play_turn`](Self::play_turn).
    pub fn decide(&self, grid: &Grid) -> Vec<Decision> {
        let decisions = match self.difficulty {
            Difficulty::Easy => Vec::new(),
            Difficulty::Medium => counting_rules(grid),
            Difficulty::Hard => {
                let counted = counting_rules(grid);
                if counted.is_empty() {
                    pattern::one_two_one(grid)
                } else {
                    counted
                }
            }
        };
        if decisions.is_empty() {
            vec![Decision::Pass]
        } else {
            decisions
        }
    }

    /// Play one turn and return the decisions that changed the board.
    ///
    /// Application stops as soon as the round ends. When no deduction
    /// changes anything, a random untouched cell is revealed instead.
    pub fn play_turn<A: Actions + ?Sized>(&mut self, actions: &mut A) -> Result<Vec<Decision>> {
        if actions.is_game_over() {
            warn!("{} solver asked to play a finished round", self.difficulty);
            return Err(EngineError::PreconditionViolation(
                "solver turn requested after the round ended",
            ));
        }

        let decisions = self.decide(actions.grid());
        let mut applied = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let Some((intent, at)) = decision.action() else {
                continue;
            };
            if !actions.perform(intent, at)?.is_noop() {
                applied.push(decision);
            }
            if actions.is_game_over() {
                break;
            }
        }

        if applied.is_empty() && !actions.is_game_over() {
            let guess = self.random_reveal(actions.grid())?;
            if let Some((intent, at)) = guess.action() {
                actions.perform(intent, at)?;
            }
            applied.push(guess);
        }

        debug!("{} solver turn: {:?}", self.difficulty, applied);
        Ok(applied)
    }

    /// Pick a random untouched cell to reveal.
    fn random_reveal(&mut self, grid: &Grid) -> Result<Decision> {
        let untouched = grid.untouched_cells()?;
        let at = untouched[self.rng.gen_range(untouched.len())];
        trace!("guessing at {:?} among {} untouched cells", at, untouched.len());
        Ok(Decision::RevealAt(at))
    }
}

/// The two counting rules, applied to the first revealed cell they affect.
///
/// For a revealed number `n` with hidden neighbors `H` and flagged neighbors
/// `F`: `|H| == n` makes every unflagged cell of `H` a mine, and `|F| == n`
/// makes every unflagged cell of `H` safe. Returns an empty list when neither
/// rule changes anything anywhere.
pub fn counting_rules(grid: &Grid) -> Vec<Decision> {
    for at in grid.coords() {
        let cell = grid.cell(at);
        // A revealed mine is the detonation marker, not a clue.
        if !cell.is_revealed || cell.has_mine {
            continue;
        }

        let hidden: Vec<Coord> = grid
            .neighbors(at.0, at.1)
            .iter()
            .copied()
            .filter(|&n| !grid.cell(n).is_revealed)
            .collect();
        if hidden.is_empty() {
            continue;
        }
        let flagged = hidden.iter().filter(|&&n| grid.cell(n).has_flag).count();
        let count = cell.neighbor_count as usize;
        let unflagged = hidden.iter().copied().filter(|&n| !grid.cell(n).has_flag);

        if hidden.len() == count {
            let decisions: Vec<Decision> = unflagged.map(Decision::FlagAt).collect();
            if !decisions.is_empty() {
                trace!("all-mines at {:?}: {:?}", at, decisions);
                return decisions;
            }
        } else if flagged == count {
            let decisions: Vec<Decision> = unflagged.map(Decision::RevealAt).collect();
            if !decisions.is_empty() {
                trace!("all-safe at {:?}: {:?}", at, decisions);
                return decisions;
            }
        }
    }
    Vec::new()
}
