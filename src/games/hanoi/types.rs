//! Core domain types for the Towers of Hanoi.

use super::rules;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Largest disk count the engine supports.
///
/// Keeps `2^N - 1` comfortably inside a `u64` and the solver's trace small.
pub const MAX_SUPPORTED_DISKS: u8 = 20;

/// A puzzle piece, identified by its size rank.
///
/// Size 1 is the smallest disk; size N the largest. Sizes are unique within
/// a puzzle, so the size doubles as the disk's identity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("disk {}", size)]
pub struct Disk {
    size: u8,
}

impl Disk {
    /// Creates a disk of the given size rank.
    pub const fn new(size: u8) -> Self {
        Self { size }
    }

    /// Returns the size rank (1 = smallest).
    pub fn size(self) -> u8 {
        self.size
    }
}

/// One of the three pegs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PegId {
    /// Left peg (index 0).
    Left,
    /// Middle peg (index 1).
    Middle,
    /// Right peg (index 2).
    Right,
}

impl PegId {
    /// All three pegs, left to right.
    pub const ALL: [PegId; 3] = [PegId::Left, PegId::Middle, PegId::Right];

    /// Converts the peg to its storage index (0-2).
    pub fn index(self) -> usize {
        match self {
            PegId::Left => 0,
            PegId::Middle => 1,
            PegId::Right => 2,
        }
    }

    /// Creates a peg from its storage index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the peg that is neither `self` nor `other`.
    ///
    /// Returns `None` when both name the same peg.
    pub fn third(self, other: PegId) -> Option<PegId> {
        if self == other {
            return None;
        }
        Self::ALL.into_iter().find(|p| *p != self && *p != other)
    }

    /// Parses a peg from user text: a name, its initial, or a 1-based number.
    #[instrument]
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" | "1" => Some(PegId::Left),
            "middle" | "mid" | "m" | "2" => Some(PegId::Middle),
            "right" | "r" | "3" => Some(PegId::Right),
            _ => None,
        }
    }
}

impl std::str::FromStr for PegId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .ok_or_else(|| format!("unknown peg '{}' (expected left, middle or right)", s))
    }
}

/// An ordered stack of disks.
///
/// Stored bottom-to-top: the last element is the top, movable disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Peg {
    disks: Vec<Disk>,
}

impl Peg {
    /// Creates an empty peg.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a peg holding a full tower of `n` disks, largest at the bottom.
    pub fn tower(n: u8) -> Self {
        Self {
            disks: (1..=n).rev().map(Disk::new).collect(),
        }
    }

    /// Disks in bottom-to-top order.
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// The topmost (movable) disk.
    pub fn top(&self) -> Option<Disk> {
        self.disks.last().copied()
    }

    /// Number of disks on the peg.
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Returns true if the peg holds no disks.
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Returns true if `disk` is on this peg.
    pub fn contains(&self, disk: Disk) -> bool {
        self.disks.contains(&disk)
    }

    /// Stacking offset of `disk`: how many disks sit beneath it.
    pub fn offset_of(&self, disk: Disk) -> Option<usize> {
        self.disks.iter().position(|d| *d == disk)
    }

    /// Detaches the top disk.
    pub(super) fn take_top(&mut self) -> Option<Disk> {
        self.disks.pop()
    }

    /// Places `disk` on top if the legality rule allows it.
    ///
    /// Returns the resulting stack depth, or hands the disk back when the
    /// placement is blocked.
    pub(super) fn place(&mut self, disk: Disk) -> Result<usize, Disk> {
        if !rules::can_place(disk, self) {
            return Err(disk);
        }
        self.disks.push(disk);
        Ok(self.disks.len())
    }

    /// Builds a peg from raw bottom-to-top contents, skipping the legality rule.
    #[cfg(test)]
    pub(crate) fn from_disks(disks: Vec<Disk>) -> Self {
        Self { disks }
    }
}

/// Inclusive range of disk counts a new puzzle may be created with.
///
/// Only built through [`DiskBounds::new`], which keeps `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskBounds {
    min: u8,
    max: u8,
}

impl DiskBounds {
    /// Creates bounds, clamped to what the engine supports.
    ///
    /// `min` is raised to at least 1 and `max` lowered to at most
    /// [`MAX_SUPPORTED_DISKS`]; `max` never drops below `min`.
    pub fn new(min: u8, max: u8) -> Self {
        let min = min.clamp(1, MAX_SUPPORTED_DISKS);
        let max = max.clamp(min, MAX_SUPPORTED_DISKS);
        Self { min, max }
    }

    /// Everything the engine can represent.
    pub fn supported() -> Self {
        Self::new(1, MAX_SUPPORTED_DISKS)
    }

    /// Smallest allowed count.
    pub fn min(&self) -> u8 {
        self.min
    }

    /// Largest allowed count.
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Returns the count as a `u8` if it lies within bounds.
    pub fn check(&self, requested: usize) -> Option<u8> {
        u8::try_from(requested)
            .ok()
            .filter(|n| (self.min..=self.max).contains(n))
    }
}

impl Default for DiskBounds {
    fn default() -> Self {
        Self::new(2, 8)
    }
}
