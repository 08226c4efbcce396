//! Descending stacks invariant: no disk rests on a smaller one.

use super::super::PuzzleState;
use super::Invariant;

/// Invariant: every peg is strictly decreasing from bottom to top.
pub struct DescendingStacksInvariant;

impl Invariant<PuzzleState> for DescendingStacksInvariant {
    fn holds(state: &PuzzleState) -> bool {
        state
            .pegs()
            .all(|(_, peg)| peg.disks().windows(2).all(|w| w[0].size() > w[1].size()))
    }

    fn description() -> &'static str {
        "Every peg is strictly decreasing from bottom to top"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanoi::{Disk, Peg, PegId};

    #[test]
    fn test_full_tower_holds() {
        let state = PuzzleState::new(8).expect("valid count");
        assert!(DescendingStacksInvariant::holds(&state));
    }

    #[test]
    fn test_equal_sizes_violate() {
        let mut state = PuzzleState::new(2).expect("valid count");
        state.pegs[PegId::Left.index()] = Peg::from_disks(vec![Disk::new(2), Disk::new(2)]);
        assert!(!DescendingStacksInvariant::holds(&state));
    }

    #[test]
    fn test_inverted_stack_violates() {
        let mut state = PuzzleState::new(2).expect("valid count");
        state.pegs[PegId::Left.index()] = Peg::from_disks(vec![Disk::new(1), Disk::new(2)]);
        assert!(!DescendingStacksInvariant::holds(&state));
    }
}
