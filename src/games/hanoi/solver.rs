//! Iterative (recursion-free) solver.
//!
//! The classic three-peg scheme restated as a flat loop: move `k` of
//! `2^N - 1` is classified by `k mod 3` into a candidate peg pair, and the
//! only legal transfer between that pair is applied. For even N the
//! destination and auxiliary roles are swapped up front so the tower lands
//! on the requested peg.
//!
//! The solver advances one move per [`IterativeSolver::step`], so pacing
//! and cancellation stay with the caller.

use super::rules::optimal_move_count;
use super::{Activity, DiskBounds, HanoiError, IllegalState, Move, PegId, PuzzleState};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum SolverPhase {
    /// Created, not started.
    Idle,
    /// Holding the puzzle and applying moves.
    Running,
    /// Every move applied; the tower is on the destination.
    Completed,
    /// Stopped at a step boundary before completing.
    Cancelled,
}

/// Peg roles the move classification works with.
///
/// After the parity swap `destination` may differ from the peg the caller
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverRoles {
    /// Peg the tower starts on.
    pub source: PegId,
    /// Peg paired with `source` on moves where `k mod 3 == 1`.
    pub destination: PegId,
    /// The remaining peg.
    pub auxiliary: PegId,
}

impl SolverRoles {
    /// Assigns roles for an `n`-disk transfer from `source` to `destination`.
    pub fn for_transfer(n: u8, source: PegId, destination: PegId) -> Result<Self, HanoiError> {
        let auxiliary = source
            .third(destination)
            .ok_or(IllegalState::SamePeg(source))?;

        let roles = if n % 2 == 0 {
            Self {
                source,
                destination: auxiliary,
                auxiliary: destination,
            }
        } else {
            Self {
                source,
                destination,
                auxiliary,
            }
        };
        Ok(roles)
    }

    /// Candidate pair for the 1-based move index `k`.
    pub fn candidates(&self, k: u64) -> (PegId, PegId) {
        match k % 3 {
            1 => (self.source, self.destination),
            2 => (self.source, self.auxiliary),
            _ => (self.auxiliary, self.destination),
        }
    }
}

/// Step-wise solver for a tower sitting on one peg.
#[derive(Debug, Clone)]
pub struct IterativeSolver {
    source: PegId,
    destination: PegId,
    roles: Option<SolverRoles>,
    total_moves: u64,
    applied: u64,
    phase: SolverPhase,
}

impl IterativeSolver {
    /// Creates an idle solver for a transfer from `source` to `destination`.
    ///
    /// # Errors
    ///
    /// [`IllegalState::SamePeg`] if both name the same peg.
    #[instrument]
    pub fn new(source: PegId, destination: PegId) -> Result<Self, HanoiError> {
        if source == destination {
            return Err(IllegalState::SamePeg(source).into());
        }
        Ok(Self {
            source,
            destination,
            roles: None,
            total_moves: 0,
            applied: 0,
            phase: SolverPhase::Idle,
        })
    }

    /// Takes hold of the puzzle: `Idle -> Running`.
    ///
    /// # Errors
    ///
    /// [`HanoiError::IllegalState`] if this solver already ran, a drag or
    /// another solve is in progress, or the source peg does not hold the
    /// complete tower.
    #[instrument(skip_all, fields(source = %self.source, destination = %self.destination))]
    pub fn start(&mut self, state: &mut PuzzleState) -> Result<(), HanoiError> {
        match self.phase {
            SolverPhase::Idle => {}
            SolverPhase::Running => return Err(IllegalState::SolverActive.into()),
            SolverPhase::Completed | SolverPhase::Cancelled => {
                return Err(IllegalState::SolverFinished.into());
            }
        }
        match state.activity() {
            Activity::Idle => {}
            Activity::Dragging(s) => {
                return Err(IllegalState::DragInProgress(s.disk(), s.origin()).into());
            }
            Activity::Solving => return Err(IllegalState::SolverActive.into()),
        }
        if !state.is_solved_on(self.source) {
            return Err(IllegalState::TowerNotAssembled(self.source).into());
        }

        let n = state.disk_count();
        let roles = SolverRoles::for_transfer(n, self.source, self.destination)?;
        self.roles = Some(roles);
        self.total_moves = optimal_move_count(n);
        self.applied = 0;
        self.phase = SolverPhase::Running;
        state.set_activity(Activity::Solving);

        info!(disks = n, total_moves = self.total_moves, ?roles, "Solver started");
        Ok(())
    }

    /// Applies the next move.
    ///
    /// Returns `Ok(None)` once the run has completed or been cancelled.
    ///
    /// # Errors
    ///
    /// [`IllegalState::SolverNotRunning`] before [`start`](Self::start);
    /// [`HanoiError::InvariantViolation`] if the puzzle was changed behind
    /// the solver's back.
    pub fn step(&mut self, state: &mut PuzzleState) -> Result<Option<Move>, HanoiError> {
        let roles = match (self.phase, self.roles) {
            (SolverPhase::Running, Some(roles)) => roles,
            (SolverPhase::Completed | SolverPhase::Cancelled, _) => return Ok(None),
            _ => return Err(IllegalState::SolverNotRunning.into()),
        };
        if !state.is_solving() {
            return Err(HanoiError::InvariantViolation(
                "puzzle is not held by the solver".to_string(),
            ));
        }

        let k = self.applied + 1;
        let (a, b) = roles.candidates(k);
        let (from, to) = Self::direction(state, a, b)?;
        let mv = state.relocate(from, to)?;
        self.applied = k;
        debug!(move_number = k, total = self.total_moves, %mv, "Solver move");

        if self.applied == self.total_moves {
            state.set_activity(Activity::Idle);
            self.phase = SolverPhase::Completed;
            if !state.is_solved_on(self.destination) {
                return Err(HanoiError::InvariantViolation(format!(
                    "solver finished without the tower on {}",
                    self.destination
                )));
            }
            info!(moves = self.applied, destination = %self.destination, "Solver completed");
        }

        Ok(Some(mv))
    }

    /// Stops a running solver at the current step boundary and releases the puzzle.
    ///
    /// Has no effect unless the solver is running.
    #[instrument(skip_all)]
    pub fn cancel(&mut self, state: &mut PuzzleState) {
        if self.phase != SolverPhase::Running {
            return;
        }
        self.phase = SolverPhase::Cancelled;
        if state.is_solving() {
            state.set_activity(Activity::Idle);
        }
        info!(moves = self.applied, remaining = self.moves_remaining(), "Solver cancelled");
    }

    /// Runs the remaining moves, calling `pace` between consecutive moves.
    ///
    /// Starts the solver first if it is idle. Returning
    /// [`ControlFlow::Break`] from `pace` cancels the run before the next
    /// move. Returns the moves applied by this call.
    pub fn run_with<F>(
        &mut self,
        state: &mut PuzzleState,
        mut pace: F,
    ) -> Result<Vec<Move>, HanoiError>
    where
        F: FnMut(&Move) -> ControlFlow<()>,
    {
        if self.phase == SolverPhase::Idle {
            self.start(state)?;
        }

        let mut moves = Vec::with_capacity(usize::try_from(self.moves_remaining()).unwrap_or(0));
        let mut run = ActiveRun::new(state, self);
        while let Some(mv) = run.solver.step(run.state)? {
            moves.push(mv);
            if run.solver.is_running() && pace(&mv).is_break() {
                run.solver.cancel(run.state);
                break;
            }
        }
        Ok(moves)
    }

    /// Runs the remaining moves without pausing.
    pub fn run_to_completion(&mut self, state: &mut PuzzleState) -> Result<Vec<Move>, HanoiError> {
        self.run_with(state, |_| ControlFlow::Continue(()))
    }

    /// Computes the full move sequence for `n` disks on a scratch puzzle.
    #[instrument]
    pub fn plan(n: u8, source: PegId, destination: PegId) -> Result<Vec<Move>, HanoiError> {
        let mut scratch =
            PuzzleState::with_tower_on(usize::from(n), source, DiskBounds::supported())?;
        Self::new(source, destination)?.run_to_completion(&mut scratch)
    }

    /// Picks the legal direction between two candidate pegs.
    fn direction(state: &PuzzleState, a: PegId, b: PegId) -> Result<(PegId, PegId), HanoiError> {
        match (state.peg(a).top(), state.peg(b).top()) {
            (Some(x), Some(y)) => {
                debug_assert_ne!(x, y, "two pegs share a top disk");
                // Smaller top moves onto the larger one.
                if x < y { Ok((a, b)) } else { Ok((b, a)) }
            }
            (Some(_), None) => Ok((a, b)),
            (None, Some(_)) => Ok((b, a)),
            (None, None) => Err(HanoiError::InvariantViolation(format!(
                "candidate pegs {} and {} are both empty",
                a, b
            ))),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Returns true while the solver holds the puzzle.
    pub fn is_running(&self) -> bool {
        self.phase == SolverPhase::Running
    }

    /// Returns true once the run has completed or been cancelled.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SolverPhase::Completed | SolverPhase::Cancelled)
    }

    /// Peg the tower starts on.
    pub fn source(&self) -> PegId {
        self.source
    }

    /// Peg the tower ends on.
    pub fn destination(&self) -> PegId {
        self.destination
    }

    /// Roles in effect, once started.
    pub fn roles(&self) -> Option<SolverRoles> {
        self.roles
    }

    /// Total moves of the run (`2^N - 1`), once started.
    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    /// Moves applied so far.
    pub fn moves_applied(&self) -> u64 {
        self.applied
    }

    /// Moves still to apply.
    pub fn moves_remaining(&self) -> u64 {
        self.total_moves - self.applied
    }
}

/// A solver run that holds the puzzle.
///
/// Dropping it while the solver is still running cancels the run at the
/// current step boundary, so an error, a panicking pace callback or a
/// dropped future never leaves the puzzle stuck in [`Activity::Solving`].
pub(super) struct ActiveRun<'a> {
    pub(super) state: &'a mut PuzzleState,
    pub(super) solver: &'a mut IterativeSolver,
}

impl<'a> ActiveRun<'a> {
    pub(super) fn new(state: &'a mut PuzzleState, solver: &'a mut IterativeSolver) -> Self {
        Self { state, solver }
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if self.solver.is_running() {
            warn!(moves = self.solver.moves_applied(), "Solver run abandoned, releasing puzzle");
            self.solver.cancel(self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanoi::{Disk, ManualMoveEngine, Peg};

    #[test]
    fn test_odd_count_keeps_roles() {
        let roles = SolverRoles::for_transfer(3, PegId::Left, PegId::Right).expect("distinct pegs");
        assert_eq!(roles.destination, PegId::Right);
        assert_eq!(roles.auxiliary, PegId::Middle);
    }

    #[test]
    fn test_even_count_swaps_roles() {
        let roles = SolverRoles::for_transfer(4, PegId::Left, PegId::Right).expect("distinct pegs");
        assert_eq!(roles.destination, PegId::Middle);
        assert_eq!(roles.auxiliary, PegId::Right);
    }

    #[test]
    fn test_candidate_classification() {
        let roles = SolverRoles::for_transfer(3, PegId::Left, PegId::Right).expect("distinct pegs");
        assert_eq!(roles.candidates(1), (PegId::Left, PegId::Right));
        assert_eq!(roles.candidates(2), (PegId::Left, PegId::Middle));
        assert_eq!(roles.candidates(3), (PegId::Middle, PegId::Right));
        assert_eq!(roles.candidates(4), (PegId::Left, PegId::Right));
    }

    #[test]
    fn test_three_disk_sequence() {
        let moves = IterativeSolver::plan(3, PegId::Left, PegId::Right).expect("plan");
        let trace: Vec<(u8, PegId, PegId)> =
            moves.iter().map(|m| (m.disk.size(), m.from, m.to)).collect();
        assert_eq!(
            trace,
            vec![
                (1, PegId::Left, PegId::Right),
                (2, PegId::Left, PegId::Middle),
                (1, PegId::Right, PegId::Middle),
                (3, PegId::Left, PegId::Right),
                (1, PegId::Middle, PegId::Left),
                (2, PegId::Middle, PegId::Right),
                (1, PegId::Left, PegId::Right),
            ]
        );
    }

    #[test]
    fn test_step_before_start() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        assert_eq!(
            solver.step(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::SolverNotRunning)
        );
    }

    #[test]
    fn test_same_peg_rejected() {
        let err = IterativeSolver::new(PegId::Middle, PegId::Middle).unwrap_err();
        assert_eq!(err.illegal_state(), Some(IllegalState::SamePeg(PegId::Middle)));
    }

    #[test]
    fn test_start_requires_full_tower() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Right, PegId::Left).expect("distinct pegs");
        assert_eq!(
            solver.start(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::TowerNotAssembled(PegId::Right))
        );
        assert!(state.is_idle());
    }

    #[test]
    fn test_start_refused_during_drag() {
        let mut state = PuzzleState::new(3).expect("valid count");
        ManualMoveEngine::begin_drag(&mut state, PegId::Left, Disk::new(1)).expect("drag");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        assert!(matches!(
            solver.start(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::DragInProgress(_, PegId::Left))
        ));
    }

    #[test]
    fn test_second_solver_refused() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut first = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        first.start(&mut state).expect("start");

        let mut second = IterativeSolver::new(PegId::Left, PegId::Middle).expect("distinct pegs");
        assert_eq!(
            second.start(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::SolverActive)
        );
        assert_eq!(
            first.start(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::SolverActive)
        );
    }

    #[test]
    fn test_phases() {
        let mut state = PuzzleState::new(2).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        assert_eq!(solver.phase(), SolverPhase::Idle);

        solver.start(&mut state).expect("start");
        assert_eq!(solver.phase(), SolverPhase::Running);
        assert!(state.is_solving());

        for _ in 0..3 {
            assert!(solver.step(&mut state).expect("step").is_some());
        }
        assert_eq!(solver.phase(), SolverPhase::Completed);
        assert!(state.is_idle());
        assert!(state.is_solved_on(PegId::Right));
        assert_eq!(solver.step(&mut state).expect("step"), None);
        assert_eq!(
            solver.start(&mut state).unwrap_err().illegal_state(),
            Some(IllegalState::SolverFinished)
        );
    }

    #[test]
    fn test_pace_break_cancels() {
        let mut state = PuzzleState::new(4).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");

        let mut seen = 0;
        let moves = solver
            .run_with(&mut state, |_| {
                seen += 1;
                if seen == 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
            })
            .expect("run");

        assert_eq!(moves.len(), 5);
        assert_eq!(solver.phase(), SolverPhase::Cancelled);
        assert_eq!(solver.moves_remaining(), 10);
        assert!(state.is_idle());
    }

    #[test]
    fn test_failed_step_releases_puzzle() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        solver.start(&mut state).expect("start");

        // Empty every peg so the next step has no candidate disk.
        let removed: Vec<Peg> = state.pegs.iter_mut().map(std::mem::take).collect();
        let result = solver.run_to_completion(&mut state);

        assert!(matches!(result, Err(HanoiError::InvariantViolation(_))));
        assert_eq!(solver.phase(), SolverPhase::Cancelled);
        assert!(state.is_idle());
        assert_eq!(removed.iter().map(Peg::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_panicking_pace_releases_puzzle() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            solver.run_with(&mut state, |_| panic!("observer failed"))
        }));

        assert!(result.is_err());
        assert_eq!(solver.phase(), SolverPhase::Cancelled);
        assert!(state.is_idle());
        assert_eq!(solver.moves_applied(), 1);
    }
}
