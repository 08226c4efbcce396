//! Drag session invariant: the in-flight disk can always go home.

use super::super::{rules, Activity, PuzzleState};
use super::Invariant;

/// Invariant: while dragging, the in-flight disk fits back on its origin peg.
///
/// This is what makes a drop onto the origin (or onto nothing) always
/// succeed.
pub struct DragSessionInvariant;

impl Invariant<PuzzleState> for DragSessionInvariant {
    fn holds(state: &PuzzleState) -> bool {
        match state.activity() {
            Activity::Dragging(session) => {
                rules::can_place(session.disk(), state.peg(session.origin()))
            }
            Activity::Idle | Activity::Solving => true,
        }
    }

    fn description() -> &'static str {
        "The in-flight disk is smaller than its origin peg's top"
    }
}
