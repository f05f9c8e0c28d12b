//! Lights Out census.
//!
//! Walks every board of a grid size, in numeric order of its light bits, and
//! tallies how many are solvable and how many presses the shortest solution
//! of each takes. A size is processed in chunks so the run can stop and
//! checkpoint between any two boards.

use puzzlebox_core::lights::LightsSolver;

/// Largest grid whose `2^(size²)` boards are enumerated.
pub const MAX_CENSUS_SIZE: u8 = 5;

/// Progress and tallies for one grid size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeCensus {
    pub size: u8,
    /// Next board (light bits) to examine.
    pub next: u64,
    pub solvable: u64,
    pub unsolvable: u64,
    /// `histogram[k]` = solvable boards whose shortest solution has `k` presses.
    pub histogram: Vec<u64>,
}

impl SizeCensus {
    pub fn new(size: u8) -> Self {
        let cells = size as usize * size as usize;
        SizeCensus {
            size,
            next: 0,
            solvable: 0,
            unsolvable: 0,
            histogram: vec![0; cells + 1],
        }
    }

    /// Number of boards of this size.
    pub fn total(&self) -> u64 {
        1u64 << (self.size as u32 * self.size as u32)
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.total()
    }

    pub fn examined(&self) -> u64 {
        self.solvable + self.unsolvable
    }

    /// Longest shortest solution seen so far.
    pub fn max_presses(&self) -> Option<usize> {
        self.histogram.iter().rposition(|&n| n > 0)
    }

    /// Examine up to `budget` boards. Returns how many were examined.
    pub fn run(&mut self, solver: &LightsSolver, budget: u64) -> u64 {
        debug_assert_eq!(solver.size(), self.size);
        let end = self.total().min(self.next.saturating_add(budget));
        let start = self.next;
        for lights in start..end {
            match solver.min_presses(lights) {
                Some(presses) => {
                    self.solvable += 1;
                    self.histogram[presses as usize] += 1;
                }
                None => self.unsolvable += 1,
            }
        }
        self.next = end;
        end - start
    }
}
