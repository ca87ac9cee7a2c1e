//! Error type shared by the grid, the round state machine and the solver.
//!
//! Only genuine misuse surfaces here. In-round actions that have nothing to do
//! (revealing a flagged cell, flagging past the mine budget) are reported
//! through their return values instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Bad grid size or mine count, at construction, reset or mine placement.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A coordinate outside `[0, size)` on either axis.
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// The caller asked for something the current board state cannot give,
    /// e.g. a solver turn after the round ended.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::OutOfBounds { row: 10, col: 2, size: 10 };
        assert_eq!(err.to_string(), "cell (10, 2) is outside the 10x10 grid");

        let err = EngineError::PreconditionViolation("round is over");
        assert_eq!(err.to_string(), "precondition violated: round is over");
    }
}
