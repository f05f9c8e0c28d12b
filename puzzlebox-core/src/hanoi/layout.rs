//! World-space placement of pegs and disks.
//!
//! The renderer draws with these, and the session uses them as start and end
//! points of a move animation, so both always agree on where a disk rests.

use crate::animation::Vec3;

use super::pegs::{Disk, PEG_COUNT};

/// Distance between neighbouring pegs along x.
pub const PEG_SPACING: f32 = 3.0;
/// Height of a peg's base plate.
pub const BASE_HEIGHT: f32 = 0.15;
/// Thickness of every disk.
pub const DISK_HEIGHT: f32 = 0.3;
/// Radius of disk 1.
pub const MIN_DISK_RADIUS: f32 = 0.4;
/// Radius of the largest disk.
pub const MAX_DISK_RADIUS: f32 = 1.2;

/// x coordinate of a peg; the middle peg is at the origin.
pub fn peg_x(peg: usize) -> f32 {
    (peg as f32 - (PEG_COUNT as f32 - 1.0) / 2.0) * PEG_SPACING
}

/// Resting position of the disk at stack `level` (0 = bottom) on `peg`.
pub fn disk_position(peg: usize, level: usize) -> Vec3 {
    Vec3::new(
        peg_x(peg),
        BASE_HEIGHT + DISK_HEIGHT / 2.0 + level as f32 * DISK_HEIGHT,
        0.0,
    )
}

/// Lowest height at which a disk clears a stack of all `disk_count` disks.
pub fn clearance_height(disk_count: u8) -> f32 {
    disk_position(0, disk_count as usize).y
}

/// Radius of `disk` when `disk_count` disks are in play. Radii are spread
/// evenly between [`MIN_DISK_RADIUS`] and [`MAX_DISK_RADIUS`].
pub fn disk_radius(disk: Disk, disk_count: u8) -> f32 {
    let steps = (disk_count.max(2) - 1) as f32;
    let step = (MAX_DISK_RADIUS - MIN_DISK_RADIUS) / steps;
    MIN_DISK_RADIUS + (disk.max(1) - 1) as f32 * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peg_x() {
        assert_eq!(peg_x(0), -3.0);
        assert_eq!(peg_x(1), 0.0);
        assert_eq!(peg_x(2), 3.0);
    }

    #[test]
    fn test_disk_position_stacks_up() {
        let bottom = disk_position(0, 0);
        let next = disk_position(0, 1);
        assert!((bottom.y - 0.3).abs() < 1e-6);
        assert!((next.y - bottom.y - DISK_HEIGHT).abs() < 1e-6);
        assert_eq!(bottom.x, next.x);
    }

    #[test]
    fn test_clearance_above_full_stack() {
        let top = disk_position(0, 19);
        assert!(clearance_height(20) - top.y >= DISK_HEIGHT - 1e-6);
    }

    #[test]
    fn test_disk_radius_range() {
        assert_eq!(disk_radius(1, 5), MIN_DISK_RADIUS);
        assert!((disk_radius(5, 5) - MAX_DISK_RADIUS).abs() < 1e-6);
        assert!(disk_radius(2, 5) < disk_radius(3, 5));
    }
}
