//! First-class move events.
//!
//! The engine reports every applied move as an abstract event. Whatever
//! draws the puzzle derives on-screen positions from it; no coordinates
//! live in the core.

use super::{Disk, PegId};
use serde::{Deserialize, Serialize};

/// A disk transferred from one peg to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The disk that moved.
    pub disk: Disk,
    /// Peg it left.
    pub from: PegId,
    /// Peg it landed on.
    pub to: PegId,
    /// Height of the destination stack after the move (1 = alone on the peg).
    pub depth: usize,
}

impl Move {
    /// Returns true if the disk went back to the peg it came from.
    pub fn is_return(&self) -> bool {
        self.from == self.to
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {} (depth {})", self.disk, self.from, self.to, self.depth)
    }
}

/// Result of releasing a dragged disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The disk now sits on the target peg.
    Accepted(Move),
    /// The target was blocked; the disk is back on its origin peg.
    Rejected {
        /// The disk that was dragged.
        disk: Disk,
        /// Peg the disk returned to.
        origin: PegId,
        /// Peg that refused it.
        target: PegId,
    },
}

impl MoveOutcome {
    /// Returns true if the drop was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted(_))
    }

    /// The applied move, when accepted.
    pub fn applied(&self) -> Option<Move> {
        match self {
            MoveOutcome::Accepted(mv) => Some(*mv),
            MoveOutcome::Rejected { .. } => None,
        }
    }
}
