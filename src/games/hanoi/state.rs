//! Puzzle state: three pegs plus whoever currently holds them.

use super::contracts::{Contract, MoveContract, Placement};
use super::{Disk, DiskBounds, HanoiError, IllegalState, Move, Peg, PegId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A manual drag in progress: the detached disk and the peg it left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragSession {
    disk: Disk,
    origin: PegId,
}

impl DragSession {
    /// The in-flight disk.
    pub fn disk(&self) -> Disk {
        self.disk
    }

    /// The peg the disk was lifted from.
    pub fn origin(&self) -> PegId {
        self.origin
    }
}

/// Which actor currently owns mutations of the puzzle.
///
/// Manual dragging and automatic solving exclude each other: the state is
/// in at most one of these at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    /// Nothing in progress; every disk rests on a peg.
    #[default]
    Idle,
    /// A disk is detached and held by a manual drag.
    Dragging(DragSession),
    /// The solver is moving disks.
    Solving,
}

/// Complete puzzle state.
///
/// Owns exactly three pegs. Draggability and the drag source are derived
/// from [`Activity`] rather than stored per peg or per disk. Serializable
/// for observers, but only built through the constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleState {
    pub(super) pegs: [Peg; 3],
    pub(super) disk_count: u8,
    pub(super) activity: Activity,
}

impl PuzzleState {
    /// Creates a puzzle with `n` disks on the left peg, using the default 2-8 bounds.
    ///
    /// # Errors
    ///
    /// Returns [`HanoiError::InvalidDiskCount`] if `n` is out of bounds.
    #[instrument]
    pub fn new(n: usize) -> Result<Self, HanoiError> {
        Self::with_bounds(n, DiskBounds::default())
    }

    /// Creates a puzzle with `n` disks on the left peg.
    #[instrument]
    pub fn with_bounds(n: usize, bounds: DiskBounds) -> Result<Self, HanoiError> {
        Self::with_tower_on(n, PegId::Left, bounds)
    }

    /// Creates a puzzle with the complete tower of `n` disks on `peg`.
    #[instrument]
    pub fn with_tower_on(n: usize, peg: PegId, bounds: DiskBounds) -> Result<Self, HanoiError> {
        let disk_count = bounds.check(n).ok_or(HanoiError::InvalidDiskCount {
            requested: n,
            min: bounds.min(),
            max: bounds.max(),
        })?;

        let mut pegs = [Peg::new(), Peg::new(), Peg::new()];
        pegs[peg.index()] = Peg::tower(disk_count);

        info!(disks = disk_count, %peg, "New puzzle");
        Ok(Self {
            pegs,
            disk_count,
            activity: Activity::Idle,
        })
    }

    /// Number of disks in the puzzle.
    pub fn disk_count(&self) -> u8 {
        self.disk_count
    }

    /// Returns the given peg.
    pub fn peg(&self, id: PegId) -> &Peg {
        &self.pegs[id.index()]
    }

    /// All pegs, left to right.
    pub fn pegs(&self) -> impl Iterator<Item = (PegId, &Peg)> {
        PegId::ALL.into_iter().zip(self.pegs.iter())
    }

    /// Current activity.
    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// The active drag, if any.
    pub fn drag(&self) -> Option<DragSession> {
        match self.activity {
            Activity::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// The disk detached by the active drag.
    pub fn in_flight(&self) -> Option<Disk> {
        self.drag().map(|s| s.disk)
    }

    /// Returns true if `peg` is the origin of the active drag.
    pub fn is_drag_source(&self, peg: PegId) -> bool {
        self.drag().is_some_and(|s| s.origin == peg)
    }

    /// Returns true if no drag or solve is in progress.
    pub fn is_idle(&self) -> bool {
        self.activity == Activity::Idle
    }

    /// Returns true if a manual drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.activity, Activity::Dragging(_))
    }

    /// Returns true if the solver holds the puzzle.
    pub fn is_solving(&self) -> bool {
        self.activity == Activity::Solving
    }

    /// Returns true if `disk` may be picked up right now.
    ///
    /// Only the top disk of a peg is eligible, and only while idle.
    pub fn is_draggable(&self, disk: Disk) -> bool {
        self.is_idle() && self.pegs.iter().any(|p| p.top() == Some(disk))
    }

    /// Every disk that may be picked up right now, with its peg.
    pub fn draggable_disks(&self) -> Vec<(PegId, Disk)> {
        if !self.is_idle() {
            return Vec::new();
        }
        self.pegs()
            .filter_map(|(id, peg)| peg.top().map(|d| (id, d)))
            .collect()
    }

    /// Finds the peg holding `disk`. Returns `None` for the in-flight disk.
    pub fn locate(&self, disk: Disk) -> Option<PegId> {
        self.pegs().find(|(_, p)| p.contains(disk)).map(|(id, _)| id)
    }

    /// The peg holding the complete tower, if any.
    pub fn tower_peg(&self) -> Option<PegId> {
        PegId::ALL.into_iter().find(|id| self.is_solved_on(*id))
    }

    /// Returns true if `peg` holds every disk in order.
    pub fn is_solved_on(&self, peg: PegId) -> bool {
        self.peg(peg).len() == usize::from(self.disk_count)
    }

    /// Every disk in the puzzle: pegs left to right, then the in-flight disk.
    pub fn all_disks(&self) -> Vec<Disk> {
        self.pegs
            .iter()
            .flat_map(|p| p.disks().iter().copied())
            .chain(self.in_flight())
            .collect()
    }

    pub(super) fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    /// Detaches the top disk of `peg` into a new drag session.
    pub(super) fn lift(&mut self, peg: PegId) -> Result<DragSession, HanoiError> {
        let disk = self.pegs[peg.index()]
            .take_top()
            .ok_or(IllegalState::EmptyPeg(peg))?;
        let session = DragSession { disk, origin: peg };
        self.activity = Activity::Dragging(session);
        Ok(session)
    }

    /// Places a detached disk on `to` through the legality gate.
    ///
    /// Hands the disk back if the placement is blocked.
    pub(super) fn settle(&mut self, disk: Disk, from: PegId, to: PegId) -> Result<Move, Disk> {
        let depth = self.pegs[to.index()].place(disk)?;
        let mv = Move {
            disk,
            from,
            to,
            depth,
        };
        debug!(%mv, "Disk settled");
        Ok(mv)
    }

    /// Moves the top disk of `from` onto `to` as one all-or-nothing step.
    ///
    /// Legality is checked before anything is detached, so a refused move
    /// leaves the state untouched.
    pub(super) fn relocate(&mut self, from: PegId, to: PegId) -> Result<Move, HanoiError> {
        let disk = self.peg(from).top().ok_or(IllegalState::EmptyPeg(from))?;
        MoveContract::pre(self, &Placement::new(disk, to))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        self.pegs[from.index()].take_top();
        let mv = self.settle(disk, from, to).map_err(|d| {
            HanoiError::InvariantViolation(format!(
                "{} refused by {} after precondition held",
                d, to
            ))
        })?;

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        Ok(mv)
    }
}

impl std::fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (id, peg)) in self.pegs().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}:", id)?;
            for disk in peg.disks() {
                write!(f, " {}", disk.size())?;
            }
        }
        if let Some(session) = self.drag() {
            write!(f, " | in flight: {} from {}", session.disk.size(), session.origin)?;
        }
        Ok(())
    }
}
