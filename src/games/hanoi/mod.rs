//! Towers of Hanoi puzzle engine.
//!
//! Three pegs, N disks, and one rule: a disk may only rest on an empty peg
//! or on a larger disk. Disks move either one drag at a time through
//! [`ManualMoveEngine`] or all at once through [`IterativeSolver`]; both
//! go through the same legality gate and the same invariants.

mod action;
mod contracts;
mod error;
mod invariants;
mod manual;
mod rules;
mod runner;
mod solver;
mod state;
mod types;

pub use action::{Move, MoveOutcome};
pub use contracts::{Contract, MoveContract, Placement};
pub use error::{HanoiError, IllegalState};
pub use invariants::{
    DescendingStacksInvariant, DiskConservationInvariant, DragSessionInvariant, HanoiInvariants,
    Invariant, InvariantSet, InvariantViolation,
};
pub use manual::ManualMoveEngine;
pub use rules::{can_place, optimal_move_count};
pub(crate) use runner::drive_paced;
pub use runner::{
    SolveOutcome, SolveReport, SolveRun, SolverEvent, SolverTask, cancel_channel, run_paced,
};
pub use solver::{IterativeSolver, SolverPhase, SolverRoles};
pub use state::{Activity, DragSession, PuzzleState};
pub use types::{Disk, DiskBounds, MAX_SUPPORTED_DISKS, Peg, PegId};
