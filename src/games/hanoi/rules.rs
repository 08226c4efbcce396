//! Game rules for the Towers of Hanoi.
//!
//! Pure functions over pegs and disks. The legality predicate here is the
//! single gate used by both manual play and the solver.

use super::types::{Disk, Peg};

/// Returns true if `disk` may be placed on `peg`.
///
/// Legal iff the peg is empty or its top disk is strictly larger.
pub fn can_place(disk: Disk, peg: &Peg) -> bool {
    match peg.top() {
        None => true,
        Some(top) => disk.size() < top.size(),
    }
}

/// Minimum number of moves to transfer a tower of `n` disks: `2^n - 1`.
///
/// Saturates at `u64::MAX`, which is exact for `n == 64`.
pub fn optimal_move_count(n: u8) -> u64 {
    1u64.checked_shl(u32::from(n)).map_or(u64::MAX, |power| power - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_peg_accepts_any_disk() {
        let peg = Peg::new();
        for size in 1..=8 {
            assert!(can_place(Disk::new(size), &peg));
        }
    }

    #[test]
    fn test_legality_matches_size_order() {
        for top in 1..=8u8 {
            let peg = Peg::from_disks(vec![Disk::new(top)]);
            for size in 1..=8u8 {
                assert_eq!(
                    can_place(Disk::new(size), &peg),
                    size < top,
                    "disk {} onto top {}",
                    size,
                    top
                );
            }
        }
    }

    #[test]
    fn test_equal_size_is_rejected() {
        let peg = Peg::from_disks(vec![Disk::new(5), Disk::new(3)]);
        assert!(!can_place(Disk::new(3), &peg));
    }

    #[test]
    fn test_optimal_move_count() {
        assert_eq!(optimal_move_count(1), 1);
        assert_eq!(optimal_move_count(3), 7);
        assert_eq!(optimal_move_count(4), 15);
        assert_eq!(optimal_move_count(8), 255);
    }

    #[test]
    fn test_optimal_move_count_at_width_limit() {
        assert_eq!(optimal_move_count(0), 0);
        assert_eq!(optimal_move_count(63), (1u64 << 63) - 1);
        assert_eq!(optimal_move_count(64), u64::MAX);
        assert_eq!(optimal_move_count(u8::MAX), u64::MAX);
    }
}
