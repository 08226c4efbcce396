//! Paced solver runs on tokio.
//!
//! [`run_paced`] drives an [`IterativeSolver`] against a borrowed puzzle,
//! sleeping between moves so an observer can show each one. The delay is
//! also the cancellation point: a signal on the watch channel stops the run
//! before the next move, leaving a consistent intermediate configuration.
//!
//! [`SolverTask`] does the same on a spawned task that owns the puzzle and
//! hands it back when done.

use super::solver::ActiveRun;
use super::{HanoiError, IterativeSolver, Move, PegId, PuzzleState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument};

/// Messages sent from the solver to whoever observes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverEvent {
    /// The solver took hold of the puzzle.
    Started {
        /// Peg the tower starts on.
        source: PegId,
        /// Peg the tower will end on.
        destination: PegId,
        /// Moves the full run takes.
        total_moves: u64,
    },
    /// A move was applied.
    Moved(Move),
    /// All moves applied.
    Completed {
        /// Moves applied in total.
        moves: u64,
    },
    /// Stopped early by a cancel signal.
    Cancelled {
        /// Moves applied before stopping.
        moves: u64,
    },
}

/// How a paced run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// The tower reached the destination.
    Completed,
    /// A cancel signal stopped the run.
    Cancelled,
}

/// Result of one paced run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRun {
    /// How the run ended.
    pub outcome: SolveOutcome,
    /// Moves applied during the run, in order.
    pub moves: Vec<Move>,
}

/// Creates a cancel channel for a paced run.
///
/// Send `true` to request cancellation.
pub fn cancel_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Runs the solver to the end, sleeping `delay` between moves.
///
/// Starts `solver` if it is still idle. Holding `&mut PuzzleState` for the
/// whole run keeps any other actor off the puzzle. Events go to `events`;
/// a dropped receiver is tolerated. If the run fails or the future is
/// dropped before it finishes, the solver is cancelled and the puzzle is
/// released in its current, legal configuration.
///
/// # Errors
///
/// Whatever [`IterativeSolver::start`] or [`IterativeSolver::step`] returns.
pub async fn run_paced(
    state: &mut PuzzleState,
    solver: &mut IterativeSolver,
    delay: Duration,
    events: &mpsc::UnboundedSender<SolverEvent>,
    cancel: &mut watch::Receiver<bool>,
) -> Result<SolveRun, HanoiError> {
    let mut moves = Vec::new();
    let outcome = drive_paced(state, solver, delay, events, cancel, &mut moves).await?;
    Ok(SolveRun { outcome, moves })
}

/// Same as [`run_paced`], appending each move to `moves` as it is applied.
///
/// Moves applied before an early drop are still recorded.
#[instrument(
    skip_all,
    fields(source = %solver.source(), destination = %solver.destination(), delay = ?delay)
)]
pub(crate) async fn drive_paced(
    state: &mut PuzzleState,
    solver: &mut IterativeSolver,
    delay: Duration,
    events: &mpsc::UnboundedSender<SolverEvent>,
    cancel: &mut watch::Receiver<bool>,
    moves: &mut Vec<Move>,
) -> Result<SolveOutcome, HanoiError> {
    if !solver.is_running() {
        solver.start(state)?;
    }
    let mut run = ActiveRun::new(state, solver);
    notify(
        events,
        SolverEvent::Started {
            source: run.solver.source(),
            destination: run.solver.destination(),
            total_moves: run.solver.total_moves(),
        },
    );

    let mut applied = 0;
    loop {
        if *cancel.borrow() {
            run.solver.cancel(run.state);
            notify(events, SolverEvent::Cancelled { moves: run.solver.moves_applied() });
            return Ok(SolveOutcome::Cancelled);
        }

        let Some(mv) = run.solver.step(run.state)? else {
            break;
        };
        moves.push(mv);
        applied += 1;
        notify(events, SolverEvent::Moved(mv));

        if run.solver.is_running() {
            pause(delay, cancel).await;
        }
    }

    info!(moves = applied, "Paced run completed");
    notify(events, SolverEvent::Completed { moves: run.solver.moves_applied() });
    Ok(SolveOutcome::Completed)
}

/// Sleeps for `delay`, waking early if cancellation is requested.
async fn pause(delay: Duration, cancel: &mut watch::Receiver<bool>) {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return,
            changed = cancel.changed() => match changed {
                Ok(()) if *cancel.borrow() => return,
                Ok(()) => continue,
                // Sender gone: nobody can cancel any more.
                Err(_) => {
                    (&mut sleep).await;
                    return;
                }
            },
        }
    }
}

fn notify(events: &mpsc::UnboundedSender<SolverEvent>, event: SolverEvent) {
    if events.send(event).is_err() {
        debug!("Solver event receiver dropped");
    }
}

/// Everything a finished [`SolverTask`] hands back.
#[derive(Debug)]
pub struct SolveReport {
    /// The puzzle, released by the solver.
    pub state: PuzzleState,
    /// The solver, in its final phase.
    pub solver: IterativeSolver,
    /// How the run went.
    pub result: Result<SolveRun, HanoiError>,
}

/// A paced solver run on its own tokio task.
///
/// The task owns the puzzle for the duration of the run, so nothing else
/// can touch it until [`join`](Self::join) returns it.
#[derive(Debug)]
pub struct SolverTask {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<SolveReport>,
}

impl SolverTask {
    /// Spawns the run. Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(delay = ?delay))]
    pub fn spawn(
        mut state: PuzzleState,
        mut solver: IterativeSolver,
        delay: Duration,
        events: mpsc::UnboundedSender<SolverEvent>,
    ) -> Self {
        let (cancel, mut cancel_rx) = cancel_channel();
        let handle = tokio::spawn(async move {
            let result = run_paced(&mut state, &mut solver, delay, &events, &mut cancel_rx).await;
            SolveReport {
                state,
                solver,
                result,
            }
        });
        info!("Solver task spawned");
        Self { cancel, handle }
    }

    /// Requests cancellation before the next move.
    pub fn cancel(&self) {
        // send_replace stores the value even with no receiver left.
        self.cancel.send_replace(true);
    }

    /// A handle other code can use to cancel this run.
    pub fn cancel_handle(&self) -> watch::Sender<bool> {
        self.cancel.clone()
    }

    /// Returns true once the task has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the run to end and takes the puzzle back.
    pub async fn join(self) -> Result<SolveReport, JoinError> {
        self.handle.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanoi::SolverPhase;

    #[tokio::test]
    async fn test_run_paced_completes() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_cancel, mut cancel_rx) = cancel_channel();

        let run = run_paced(&mut state, &mut solver, Duration::ZERO, &tx, &mut cancel_rx)
            .await
            .expect("run");

        assert_eq!(run.outcome, SolveOutcome::Completed);
        assert_eq!(run.moves.len(), 7);
        assert!(state.is_solved_on(PegId::Right));
        assert!(state.is_idle());

        drop(tx);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 9);
        assert!(matches!(events[0], SolverEvent::Started { total_moves: 7, .. }));
        assert_eq!(events[8], SolverEvent::Completed { moves: 7 });
    }

    #[tokio::test]
    async fn test_cancel_before_first_move() {
        let mut state = PuzzleState::new(3).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        let (tx, _rx) = mpsc::unbounded_channel();
        let (cancel, mut cancel_rx) = cancel_channel();
        cancel.send_replace(true);

        let run = run_paced(&mut state, &mut solver, Duration::ZERO, &tx, &mut cancel_rx)
            .await
            .expect("run");

        assert_eq!(run.outcome, SolveOutcome::Cancelled);
        assert!(run.moves.is_empty());
        assert!(state.is_solved_on(PegId::Left));
        assert!(state.is_idle());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_tolerated() {
        let mut state = PuzzleState::new(2).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Middle).expect("distinct pegs");
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let (cancel, mut cancel_rx) = cancel_channel();
        drop(cancel);

        let run = run_paced(&mut state, &mut solver, Duration::from_millis(1), &tx, &mut cancel_rx)
            .await
            .expect("run");
        assert_eq!(run.outcome, SolveOutcome::Completed);
        assert!(state.is_solved_on(PegId::Middle));
    }

    #[tokio::test]
    async fn test_dropped_run_releases_puzzle() {
        let mut state = PuzzleState::new(4).expect("valid count");
        let mut solver = IterativeSolver::new(PegId::Left, PegId::Right).expect("distinct pegs");
        let (tx, _rx) = mpsc::unbounded_channel();
        let (_cancel, mut cancel_rx) = cancel_channel();
        let mut moves = Vec::new();

        let run = drive_paced(
            &mut state,
            &mut solver,
            Duration::from_secs(60),
            &tx,
            &mut cancel_rx,
            &mut moves,
        );
        let elapsed = tokio::time::timeout(Duration::from_millis(50), run).await;

        assert!(elapsed.is_err());
        assert_eq!(moves.len(), 1);
        assert_eq!(solver.phase(), SolverPhase::Cancelled);
        assert!(state.is_idle());
        assert_eq!(state.draggable_disks().len(), 2);
    }
}
