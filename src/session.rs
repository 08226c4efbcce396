//! Puzzle session: one explicitly owned puzzle and its move history.

use crate::config::PuzzleConfig;
use crate::games::hanoi::{
    HanoiError, IterativeSolver, ManualMoveEngine, Move, MoveOutcome, PegId, PuzzleState,
    SolveOutcome, SolverEvent, drive_paced,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument};

/// Unique identifier for a puzzle session.
pub type SessionId = String;

/// A single active puzzle.
///
/// The session owns its [`PuzzleState`]; manual intents and solver runs
/// both go through `&mut self`, so they can never overlap.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    id: SessionId,
    config: PuzzleConfig,
    state: PuzzleState,
    history: Vec<Move>,
}

impl PuzzleSession {
    /// Starts a session with `disks` disks on the left peg.
    ///
    /// # Errors
    ///
    /// [`HanoiError::InvalidDiskCount`] if `disks` is outside the configured bounds.
    #[instrument(skip(config))]
    pub fn new(id: SessionId, config: PuzzleConfig, disks: usize) -> Result<Self, HanoiError> {
        let state = PuzzleState::with_bounds(disks, config.disk_bounds())?;
        info!(session_id = %id, disks, "Creating new puzzle session");
        Ok(Self {
            id,
            config,
            state,
            history: Vec::new(),
        })
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session configuration.
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Current puzzle state.
    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Moves applied so far, oldest first. Returns to origin are not recorded.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves applied so far.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Returns true if the tower sits complete on a peg other than where it started.
    pub fn is_solved(&self) -> bool {
        self.state.tower_peg().is_some_and(|p| p != PegId::Left)
    }

    /// Picks up the top disk of `peg`. Returns the disk's stacking offset.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn begin_drag(&mut self, peg: PegId) -> Result<usize, HanoiError> {
        ManualMoveEngine::drag_top(&mut self.state, peg).map(|(_, offset)| offset)
    }

    /// Releases the held disk over `target` (`None` for empty space).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn drop_on(&mut self, target: Option<PegId>) -> Result<MoveOutcome, HanoiError> {
        let outcome = ManualMoveEngine::attempt_drop(&mut self.state, target)?;
        if let Some(mv) = outcome.applied().filter(|mv| !mv.is_return()) {
            self.history.push(mv);
        }
        Ok(outcome)
    }

    /// Solves the puzzle onto `destination`, pausing between moves.
    ///
    /// The tower must be complete on some peg. Uses the configured step
    /// delay; the run stops early when `cancel` turns `true`. Dropping the
    /// returned future stops the run too: the moves made so far stay in the
    /// history and the puzzle is free for manual play again.
    #[instrument(skip(self, events, cancel), fields(session_id = %self.id))]
    pub async fn auto_solve(
        &mut self,
        destination: PegId,
        events: &mpsc::UnboundedSender<SolverEvent>,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<SolveOutcome, HanoiError> {
        // A scattered tower is reported by the solver as not assembled on the left peg.
        let source = self.state.tower_peg().unwrap_or(PegId::Left);
        let mut solver = IterativeSolver::new(source, destination)?;
        let delay = self.config.step_delay();
        drive_paced(&mut self.state, &mut solver, delay, events, cancel, &mut self.history).await
    }

    /// Discards the current puzzle and starts again with the same disk count.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&mut self) -> Result<(), HanoiError> {
        if self.state.is_dragging() {
            ManualMoveEngine::attempt_drop(&mut self.state, None)?;
        }
        let disks = usize::from(self.state.disk_count());
        self.state = PuzzleState::with_bounds(disks, self.config.disk_bounds())?;
        self.history.clear();
        info!("Session restarted");
        Ok(())
    }
}
