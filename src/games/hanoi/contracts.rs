//! Contract-based validation for puzzle moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} action {Q}.

use super::invariants::{HanoiInvariants, InvariantSet};
use super::rules;
use super::{Disk, HanoiError, PegId, PuzzleState};
use derive_new::new;
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), HanoiError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), HanoiError>;
}

/// Intent to put a disk on a peg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Placement {
    /// Disk being placed.
    pub disk: Disk,
    /// Peg receiving it.
    pub target: PegId,
}

/// Contract for disk placements.
///
/// Precondition: the legality rule allows the disk on the target.
///
/// Postconditions:
/// - Every peg is still strictly decreasing
/// - No disk was lost or duplicated
/// - The drag session is consistent with the pegs
pub struct MoveContract;

impl Contract<PuzzleState, Placement> for MoveContract {
    #[instrument(skip(state))]
    fn pre(state: &PuzzleState, action: &Placement) -> Result<(), HanoiError> {
        if rules::can_place(action.disk, state.peg(action.target)) {
            Ok(())
        } else {
            Err(HanoiError::InvariantViolation(format!(
                "{} cannot be placed on {}",
                action.disk, action.target
            )))
        }
    }

    fn post(before: &PuzzleState, after: &PuzzleState) -> Result<(), HanoiError> {
        if before.disk_count() != after.disk_count() {
            return Err(HanoiError::InvariantViolation(
                "Postcondition failed: disk count changed".to_string(),
            ));
        }

        HanoiInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Postcondition failed");
            HanoiError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanoi::Peg;

    #[test]
    fn test_precondition_empty_peg() {
        let state = PuzzleState::new(3).expect("valid count");
        let placement = Placement::new(Disk::new(3), PegId::Right);
        assert!(MoveContract::pre(&state, &placement).is_ok());
    }

    #[test]
    fn test_precondition_larger_disk() {
        let state = PuzzleState::new(3).expect("valid count");
        let placement = Placement::new(Disk::new(2), PegId::Left);
        assert!(matches!(
            MoveContract::pre(&state, &placement),
            Err(HanoiError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = PuzzleState::new(3).expect("valid count");
        let mut after = before.clone();
        after.relocate(PegId::Left, PegId::Middle).expect("legal");
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = PuzzleState::new(3).expect("valid count");
        let mut after = before.clone();
        after.pegs[PegId::Right.index()] = Peg::from_disks(vec![Disk::new(1), Disk::new(2)]);
        assert!(MoveContract::post(&before, &after).is_err());
    }
}
