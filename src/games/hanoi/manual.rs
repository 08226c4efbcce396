//! Manual play: drag a top disk, drop it on a peg.
//!
//! Each intent is one atomic transition on the [`PuzzleState`]. A blocked
//! drop is an ordinary [`MoveOutcome::Rejected`], not an error, and always
//! leaves the puzzle ready for the next drag.

#[cfg(debug_assertions)]
use super::contracts::{Contract, MoveContract};
use super::{Activity, Disk, HanoiError, IllegalState, MoveOutcome, PegId, PuzzleState};
use tracing::{debug, info, instrument};

/// Validates and applies user-initiated moves.
pub struct ManualMoveEngine;

impl ManualMoveEngine {
    /// Lifts `disk` off `peg` and holds it in flight.
    ///
    /// Returns the disk's stacking offset on `peg` (how many disks were
    /// beneath it), for the caller's visual continuity only.
    ///
    /// # Errors
    ///
    /// [`HanoiError::IllegalState`] if a drag or solve is in progress, the
    /// peg is empty, or `disk` is not the peg's top disk.
    #[instrument(skip_all, fields(%peg, %disk))]
    pub fn begin_drag(
        state: &mut PuzzleState,
        peg: PegId,
        disk: Disk,
    ) -> Result<usize, HanoiError> {
        Self::ensure_idle(state)?;

        let source = state.peg(peg);
        let top = source.top().ok_or(IllegalState::EmptyPeg(peg))?;
        if top != disk {
            return Err(IllegalState::NotTopDisk { disk, peg }.into());
        }
        let offset = source.len() - 1;

        state.lift(peg)?;
        debug!(offset, "Drag started");
        Ok(offset)
    }

    /// Lifts whatever disk is on top of `peg`.
    ///
    /// Returns the lifted disk and its stacking offset.
    #[instrument(skip(state))]
    pub fn drag_top(state: &mut PuzzleState, peg: PegId) -> Result<(Disk, usize), HanoiError> {
        Self::ensure_idle(state)?;
        let disk = state.peg(peg).top().ok_or(IllegalState::EmptyPeg(peg))?;
        let offset = Self::begin_drag(state, peg, disk)?;
        Ok((disk, offset))
    }

    /// Releases the in-flight disk over `target`.
    ///
    /// `None` means the disk was released over empty space; that is handled
    /// exactly like a drop back onto the origin peg, which always succeeds.
    /// Whatever the outcome, the drag is over when this returns.
    ///
    /// # Errors
    ///
    /// [`HanoiError::IllegalState`] if no drag is in progress.
    #[instrument(skip(state))]
    pub fn attempt_drop(
        state: &mut PuzzleState,
        target: Option<PegId>,
    ) -> Result<MoveOutcome, HanoiError> {
        let session = match state.activity() {
            Activity::Dragging(session) => session,
            Activity::Solving => return Err(IllegalState::SolverActive.into()),
            Activity::Idle => return Err(IllegalState::NoDiskInFlight.into()),
        };
        let origin = session.origin();
        let target = target.unwrap_or(origin);

        #[cfg(debug_assertions)]
        let before = state.clone();

        let outcome = match state.settle(session.disk(), origin, target) {
            Ok(mv) => {
                info!(%mv, "Drop accepted");
                MoveOutcome::Accepted(mv)
            }
            Err(disk) => {
                // The in-flight disk was the origin's top, so it always fits back.
                state.settle(disk, origin, origin).map_err(|d| {
                    HanoiError::InvariantViolation(format!("{} cannot return to {}", d, origin))
                })?;
                debug!(%disk, %target, "Drop rejected, disk returned to origin");
                MoveOutcome::Rejected {
                    disk,
                    origin,
                    target,
                }
            }
        };
        state.set_activity(Activity::Idle);

        #[cfg(debug_assertions)]
        MoveContract::post(&before, state)?;

        Ok(outcome)
    }

    fn ensure_idle(state: &PuzzleState) -> Result<(), HanoiError> {
        match state.activity() {
            Activity::Idle => Ok(()),
            Activity::Dragging(s) => Err(IllegalState::DragInProgress(s.disk(), s.origin()).into()),
            Activity::Solving => Err(IllegalState::SolverActive.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(n: usize) -> PuzzleState {
        PuzzleState::new(n).expect("valid count")
    }

    #[test]
    fn test_begin_drag_detaches_top() {
        let mut state = puzzle(3);
        let offset = ManualMoveEngine::begin_drag(&mut state, PegId::Left, Disk::new(1))
            .expect("top disk");

        assert_eq!(offset, 2);
        assert_eq!(state.in_flight(), Some(Disk::new(1)));
        assert!(state.is_drag_source(PegId::Left));
        assert!(!state.is_drag_source(PegId::Right));
        assert_eq!(state.peg(PegId::Left).len(), 2);
    }

    #[test]
    fn test_begin_drag_rejects_buried_disk() {
        let mut state = puzzle(3);
        let err = ManualMoveEngine::begin_drag(&mut state, PegId::Left, Disk::new(2)).unwrap_err();
        assert_eq!(
            err.illegal_state(),
            Some(IllegalState::NotTopDisk {
                disk: Disk::new(2),
                peg: PegId::Left
            })
        );
        assert!(state.is_idle());
    }

    #[test]
    fn test_begin_drag_rejects_empty_peg() {
        let mut state = puzzle(3);
        let err = ManualMoveEngine::drag_top(&mut state, PegId::Middle).unwrap_err();
        assert_eq!(err.illegal_state(), Some(IllegalState::EmptyPeg(PegId::Middle)));
    }

    #[test]
    fn test_second_drag_rejected() {
        let mut state = puzzle(3);
        ManualMoveEngine::drag_top(&mut state, PegId::Left).expect("first drag");
        let err = ManualMoveEngine::drag_top(&mut state, PegId::Left).unwrap_err();
        assert!(matches!(
            err.illegal_state(),
            Some(IllegalState::DragInProgress(_, PegId::Left))
        ));
    }

    #[test]
    fn test_drop_without_drag() {
        let mut state = puzzle(3);
        let err = ManualMoveEngine::attempt_drop(&mut state, Some(PegId::Right)).unwrap_err();
        assert_eq!(err.illegal_state(), Some(IllegalState::NoDiskInFlight));
    }

    #[test]
    fn test_accepted_drop() {
        let mut state = puzzle(3);
        ManualMoveEngine::drag_top(&mut state, PegId::Left).expect("drag");
        let outcome = ManualMoveEngine::attempt_drop(&mut state, Some(PegId::Right)).expect("drop");

        let mv = outcome.applied().expect("accepted");
        assert_eq!(mv.disk, Disk::new(1));
        assert_eq!(mv.from, PegId::Left);
        assert_eq!(mv.to, PegId::Right);
        assert_eq!(mv.depth, 1);
        assert!(state.is_idle());
        assert_eq!(state.peg(PegId::Right).top(), Some(Disk::new(1)));
    }

    #[test]
    fn test_rejected_drop_returns_disk() {
        let mut state = puzzle(3);
        ManualMoveEngine::drag_top(&mut state, PegId::Left).expect("drag");
        ManualMoveEngine::attempt_drop(&mut state, Some(PegId::Right)).expect("drop");

        ManualMoveEngine::drag_top(&mut state, PegId::Left).expect("drag disk 2");
        let outcome = ManualMoveEngine::attempt_drop(&mut state, Some(PegId::Right)).expect("drop");

        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                disk: Disk::new(2),
                origin: PegId::Left,
                target: PegId::Right
            }
        );
        assert!(state.is_idle());
        assert_eq!(state.peg(PegId::Left).top(), Some(Disk::new(2)));
    }

    #[test]
    fn test_drop_in_empty_space_returns_to_origin() {
        let mut state = puzzle(4);
        let before = state.clone();
        ManualMoveEngine::drag_top(&mut state, PegId::Left).expect("drag");
        let outcome = ManualMoveEngine::attempt_drop(&mut state, None).expect("drop");

        let mv = outcome.applied().expect("origin always accepts");
        assert!(mv.is_return());
        assert_eq!(state, before);
    }

    #[test]
    fn test_drag_refused_while_solving() {
        let mut state = puzzle(3);
        state.set_activity(Activity::Solving);
        let err = ManualMoveEngine::drag_top(&mut state, PegId::Left).unwrap_err();
        assert_eq!(err.illegal_state(), Some(IllegalState::SolverActive));
    }
}
