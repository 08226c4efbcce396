//! Strictly Hanoi library - a type-safe Towers of Hanoi engine
//!
//! The engine owns the puzzle rules and leaves drawing to whoever embeds it.
//!
//! # Architecture
//!
//! - **Games**: peg/disk model, legality rule, invariants and contracts
//! - **Manual play**: drag the top disk of a peg, drop it on another
//! - **Solver**: recursion-free optimal solver, one move per step
//! - **Runner**: paced, cancellable solver runs on tokio
//! - **Session**: one explicitly owned puzzle with its move history
//!
//! # Example
//!
//! ```
//! use strictly_hanoi::{IterativeSolver, ManualMoveEngine, PegId, PuzzleState};
//!
//! # fn example() -> Result<(), strictly_hanoi::HanoiError> {
//! let mut state = PuzzleState::new(3)?;
//!
//! // A manual move
//! ManualMoveEngine::drag_top(&mut state, PegId::Left)?;
//! let outcome = ManualMoveEngine::attempt_drop(&mut state, None)?;
//! assert!(outcome.is_accepted());
//!
//! // The whole solution
//! let mut solver = IterativeSolver::new(PegId::Left, PegId::Right)?;
//! let moves = solver.run_to_completion(&mut state)?;
//! assert_eq!(moves.len(), 7);
//! assert!(state.is_solved_on(PegId::Right));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, PuzzleConfig};

// Crate-level exports - Session management
pub use session::{PuzzleSession, SessionId};

// Crate-level exports - Puzzle engine
pub use games::hanoi::{
    Activity, Contract, DescendingStacksInvariant, Disk, DiskBounds, DiskConservationInvariant,
    DragSession, DragSessionInvariant, HanoiError, HanoiInvariants, IllegalState, Invariant,
    InvariantSet, InvariantViolation, IterativeSolver, MAX_SUPPORTED_DISKS, ManualMoveEngine, Move,
    MoveContract, MoveOutcome, Peg, PegId, Placement, PuzzleState, SolveOutcome, SolveReport,
    SolveRun, SolverEvent, SolverPhase, SolverRoles, SolverTask, can_place, cancel_channel,
    optimal_move_count, run_paced,
};
