//! Round configuration as supplied by the host (native caller or JS).

use crate::error::{EngineError, Result};
use crate::types::Difficulty;
use serde::{Deserialize, Serialize};

/// Grid size every observed frontend uses.
pub const DEFAULT_SIZE: usize = 10;

/// Mine count of the default round.
pub const DEFAULT_MINES: usize = 15;

/// Everything needed to set up a round.
///
/// Missing fields fall back to the defaults, so `{ "mine_count": 12 }` is a
/// complete config on the JS side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: usize,
    pub mine_count: usize,
    /// `None` disables the automated opponent.
    pub difficulty: Option<Difficulty>,
    /// Fixed seed for mine placement and solver guesses; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            mine_count: DEFAULT_MINES,
            difficulty: None,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(size: usize, mine_count: usize) -> Self {
        Self {
            size,
            mine_count,
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject sizes and mine counts no grid can hold.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.size, self.mine_count)
    }
}

pub(crate) fn validate_dimensions(size: usize, mine_count: usize) -> Result<()> {
    if size == 0 {
        return Err(EngineError::InvalidConfig(
            "grid size must be positive".to_string(),
        ));
    }
    let area = size
        .checked_mul(size)
        .ok_or_else(|| EngineError::InvalidConfig(format!("grid size {size} is too large")))?;
    if mine_count > area {
        return Err(EngineError::InvalidConfig(format!(
            "{mine_count} mines do not fit on a {size}x{size} grid"
        )));
    }
    Ok(())
}
