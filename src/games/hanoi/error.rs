//! Error types for the puzzle engine.
//!
//! Illegal *moves* are not errors: a blocked drop is reported as
//! [`MoveOutcome::Rejected`](super::MoveOutcome::Rejected). Errors here are
//! contract violations by the caller (or by the engine itself).

use super::{Disk, PegId};
use serde::{Deserialize, Serialize};

/// Protocol misuse against a [`PuzzleState`](super::PuzzleState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum IllegalState {
    /// A drag is already in progress.
    #[display("a drag is already in progress ({} from {})", _0, _1)]
    DragInProgress(Disk, PegId),

    /// A drop was attempted with nothing in flight.
    #[display("no disk is in flight")]
    NoDiskInFlight,

    /// The peg has no disk to pick up.
    #[display("peg {} is empty", _0)]
    EmptyPeg(PegId),

    /// The requested disk is not the top disk of the peg.
    #[display("{} is not the top disk of peg {}", disk, peg)]
    NotTopDisk {
        /// Disk the caller tried to pick up.
        disk: Disk,
        /// Peg it was requested from.
        peg: PegId,
    },

    /// The solver currently holds the puzzle.
    #[display("the solver is running")]
    SolverActive,

    /// Source and destination name the same peg.
    #[display("source and destination are both {}", _0)]
    SamePeg(PegId),

    /// The solver needs the complete tower on its source peg.
    #[display("peg {} does not hold the complete tower", _0)]
    TowerNotAssembled(PegId),

    /// `step` was called before `start`.
    #[display("the solver has not been started")]
    SolverNotRunning,

    /// `start` was called on a solver that already ran.
    #[display("the solver has already finished")]
    SolverFinished,
}

/// Error that can occur when building or mutating a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum HanoiError {
    /// The requested disk count is outside the configured bounds.
    #[display("invalid disk count {}: must be between {} and {}", requested, min, max)]
    #[from(ignore)]
    InvalidDiskCount {
        /// Count the caller asked for.
        requested: usize,
        /// Smallest allowed count.
        min: u8,
        /// Largest allowed count.
        max: u8,
    },

    /// The operation is not allowed in the current state.
    #[display("illegal state: {}", _0)]
    IllegalState(IllegalState),

    /// An invariant was violated (postcondition failure).
    #[display("invariant violation: {}", _0)]
    #[from(ignore)]
    InvariantViolation(String),
}

impl std::error::Error for HanoiError {}

impl HanoiError {
    /// Returns the illegal-state kind, if this is a protocol error.
    pub fn illegal_state(&self) -> Option<IllegalState> {
        match self {
            Self::IllegalState(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_state_converts() {
        let err: HanoiError = IllegalState::NoDiskInFlight.into();
        assert_eq!(err.illegal_state(), Some(IllegalState::NoDiskInFlight));
        assert_eq!(err.to_string(), "illegal state: no disk is in flight");
    }

    #[test]
    fn test_invalid_disk_count_message() {
        let err = HanoiError::InvalidDiskCount {
            requested: 12,
            min: 2,
            max: 8,
        };
        assert!(err.to_string().contains("between 2 and 8"));
        assert_eq!(err.illegal_state(), None);
    }
}
