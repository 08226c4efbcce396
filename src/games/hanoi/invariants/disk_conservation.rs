//! Disk conservation invariant: no disk is ever duplicated or lost.

use super::super::PuzzleState;
use super::Invariant;

/// Invariant: the pegs plus the in-flight disk hold each of disks 1..=N exactly once.
pub struct DiskConservationInvariant;

impl Invariant<PuzzleState> for DiskConservationInvariant {
    fn holds(state: &PuzzleState) -> bool {
        let mut sizes: Vec<u8> = state.all_disks().iter().map(|d| d.size()).collect();
        sizes.sort_unstable();
        sizes.into_iter().eq(1..=state.disk_count())
    }

    fn description() -> &'static str {
        "Each disk appears exactly once across the pegs and the drag"
    }
}
