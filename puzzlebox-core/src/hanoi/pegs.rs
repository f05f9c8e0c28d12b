//! Peg stacks, move legality and the solved predicate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of pegs.
pub const PEG_COUNT: usize = 3;
/// Peg every disk starts on.
pub const START_PEG: usize = 0;
/// Peg every disk must end on.
pub const GOAL_PEG: usize = 2;

/// Disk identifier; doubles as its size (1 = smallest).
pub type Disk = u8;

/// A single move: the top disk of `from` onto `to`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: usize,
    pub to: usize,
    pub disk: Disk,
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "disk {} {}→{}", self.disk, self.from, self.to)
    }
}

/// Why a move is illegal on the current board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum InvalidMove {
    #[error("peg {0} does not exist")]
    NoSuchPeg(usize),
    #[error("peg {0} is empty")]
    EmptySource(usize),
    #[error("disk {disk} cannot rest on smaller disk {onto}")]
    LargerOnSmaller { disk: Disk, onto: Disk },
}

/// Why a proposed move was not started.
///
/// None of these are fatal. `SamePeg` is how a deselect is expressed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum MoveRejected {
    #[error("invalid move: {0}")]
    Invalid(#[from] InvalidMove),
    #[error("a move is already in flight")]
    Busy,
    #[error("the puzzle is already solved")]
    AlreadySolved,
    #[error("source and destination are the same peg")]
    SamePeg,
}

/// A disk layout that breaks the stacking rules.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum InvalidPegs {
    #[error("disk count {0} is not supported")]
    DiskCount(usize),
    #[error("disk {0} is missing or duplicated")]
    Disks(usize),
    #[error("peg {peg} is not strictly decreasing from bottom to top")]
    Order { peg: usize },
    #[error("disk {disk} placed on peg {peg}")]
    Placement { disk: usize, peg: usize },
}

/// The three pegs of one puzzle, each stack listed bottom to top.
///
/// Every disk in `1..=disk_count` appears exactly once, and each stack is
/// strictly decreasing from bottom to top. Constructors and [`Pegs::apply`]
/// preserve this; there is no way to build a `Pegs` that violates it.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawPegs")]
pub struct Pegs {
    stacks: [Vec<Disk>; PEG_COUNT],
    disk_count: u8,
}

#[derive(Deserialize)]
struct RawPegs {
    stacks: [Vec<Disk>; PEG_COUNT],
}

impl TryFrom<RawPegs> for Pegs {
    type Error = InvalidPegs;

    fn try_from(raw: RawPegs) -> Result<Self, Self::Error> {
        Pegs::from_stacks(raw.stacks)
    }
}

impl Pegs {
    /// Largest supported disk count (disk ids are `u8`, positions encode in `u32`).
    pub const MAX_DISKS: u8 = 20;

    /// Starting layout: every disk on [`START_PEG`], largest at the bottom.
    ///
    /// `disk_count` is clamped to `1..=MAX_DISKS`; sessions validate it
    /// against their configured range first.
    pub fn new(disk_count: u8) -> Pegs {
        let disk_count = disk_count.clamp(1, Self::MAX_DISKS);
        let mut stacks: [Vec<Disk>; PEG_COUNT] = Default::default();
        stacks[START_PEG] = (1..=disk_count).rev().collect();
        Pegs { stacks, disk_count }
    }

    /// Build from explicit stacks, validating the stacking rules.
    pub fn from_stacks(stacks: [Vec<Disk>; PEG_COUNT]) -> Result<Pegs, InvalidPegs> {
        let total: usize = stacks.iter().map(Vec::len).sum();
        if total == 0 || total > Self::MAX_DISKS as usize {
            return Err(InvalidPegs::DiskCount(total));
        }

        let mut seen = vec![false; total + 1];
        for stack in &stacks {
            for &disk in stack {
                let d = disk as usize;
                if d == 0 || d > total || seen[d] {
                    return Err(InvalidPegs::Disks(d));
                }
                seen[d] = true;
            }
        }

        for (peg, stack) in stacks.iter().enumerate() {
            if stack.windows(2).any(|w| w[0] <= w[1]) {
                return Err(InvalidPegs::Order { peg });
            }
        }

        Ok(Pegs {
            stacks,
            disk_count: total as u8,
        })
    }

    /// Build from a peg per disk: `placement[d - 1]` is the peg of disk `d`.
    ///
    /// Every such assignment is a legal position, so this enumerates the whole
    /// `3^n` state space.
    pub fn from_placement(placement: &[usize]) -> Result<Pegs, InvalidPegs> {
        if placement.is_empty() || placement.len() > Self::MAX_DISKS as usize {
            return Err(InvalidPegs::DiskCount(placement.len()));
        }
        let mut stacks: [Vec<Disk>; PEG_COUNT] = Default::default();
        // Largest first so each stack comes out bottom to top
        for (idx, &peg) in placement.iter().enumerate().rev() {
            let disk = idx + 1;
            let stack = stacks
                .get_mut(peg)
                .ok_or(InvalidPegs::Placement { disk, peg })?;
            stack.push(disk as Disk);
        }
        Ok(Pegs {
            stacks,
            disk_count: placement.len() as u8,
        })
    }

    /// Inverse of [`Pegs::from_placement`].
    pub fn placement(&self) -> Vec<usize> {
        let mut placement = vec![0; self.disk_count as usize];
        for (peg, stack) in self.stacks.iter().enumerate() {
            for &disk in stack {
                placement[disk as usize - 1] = peg;
            }
        }
        placement
    }

    /// Base-3 index of the position, in `0..3^disk_count`. Disk 1 is the
    /// least significant digit.
    pub fn encode(&self) -> u32 {
        self.placement()
            .iter()
            .rev()
            .fold(0u32, |acc, &peg| acc * 3 + peg as u32)
    }

    #[inline]
    pub fn disk_count(&self) -> u8 {
        self.disk_count
    }

    #[inline]
    pub fn stacks(&self) -> &[Vec<Disk>; PEG_COUNT] {
        &self.stacks
    }

    /// Disks on `peg`, bottom to top. Empty for a peg that does not exist.
    pub fn stack(&self, peg: usize) -> &[Disk] {
        self.stacks.get(peg).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top disk of `peg`.
    #[inline]
    pub fn top(&self, peg: usize) -> Option<Disk> {
        self.stack(peg).last().copied()
    }

    #[inline]
    pub fn height(&self, peg: usize) -> usize {
        self.stack(peg).len()
    }

    /// Peg holding `disk`.
    pub fn find(&self, disk: Disk) -> Option<usize> {
        self.stacks.iter().position(|stack| stack.contains(&disk))
    }

    /// True if `disk` is the top disk of its peg.
    pub fn is_top(&self, disk: Disk) -> bool {
        self.find(disk)
            .is_some_and(|peg| self.top(peg) == Some(disk))
    }

    /// True if `disk` may be dropped onto `peg`: the peg is empty or its top
    /// disk is larger.
    #[inline]
    pub fn can_place(&self, disk: Disk, peg: usize) -> bool {
        match self.top(peg) {
            None => true,
            Some(top) => disk < top,
        }
    }

    /// Validate moving the top disk of `from` onto `to`. Pure.
    pub fn check_move(&self, from: usize, to: usize) -> Result<MoveRecord, MoveRejected> {
        for peg in [from, to] {
            if peg >= PEG_COUNT {
                return Err(InvalidMove::NoSuchPeg(peg).into());
            }
        }
        if from == to {
            return Err(MoveRejected::SamePeg);
        }
        let disk = self.top(from).ok_or(InvalidMove::EmptySource(from))?;
        if let Some(onto) = self.top(to) {
            if disk > onto {
                return Err(InvalidMove::LargerOnSmaller { disk, onto }.into());
            }
        }
        Ok(MoveRecord { from, to, disk })
    }

    /// Apply a move. The move is re-validated against the current stacks,
    /// so a stale record cannot corrupt the position.
    pub fn apply(&mut self, mv: MoveRecord) -> Result<(), MoveRejected> {
        let checked = self.check_move(mv.from, mv.to)?;
        if checked.disk != mv.disk {
            return Err(InvalidMove::EmptySource(mv.from).into());
        }
        self.stacks[mv.from].pop();
        self.stacks[mv.to].push(mv.disk);
        Ok(())
    }

    /// Every disk is on [`GOAL_PEG`].
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.stacks[GOAL_PEG].len() == self.disk_count as usize
    }

    /// Re-check the stacking invariant from scratch.
    pub fn check_invariant(&self) -> bool {
        Pegs::from_stacks(self.stacks.clone()).is_ok_and(|p| p.disk_count == self.disk_count)
    }
}
