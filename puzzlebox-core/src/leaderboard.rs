//! Bounded best-attempts list shared by every game.
//!
//! Entries rank by move count, then by elapsed time. Equal keys keep their
//! insertion order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Something that can be ranked on a leaderboard.
pub trait Ranked {
    /// Moves taken to solve.
    fn moves(&self) -> u32;
    /// Seconds taken to solve.
    fn time(&self) -> f64;

    /// Ranking order: fewer moves first, then faster.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.moves()
            .cmp(&other.moves())
            .then_with(|| self.time().total_cmp(&other.time()))
    }
}

/// Entries kept when a game's configuration does not say otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// Sorted, capped list of entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard<E> {
    entries: Vec<E>,
}

impl<E: Ranked> Leaderboard<E> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build from previously persisted entries, re-sorting and capping them.
    pub fn from_entries(mut entries: Vec<E>, capacity: usize) -> Self {
        entries.sort_by(E::rank_cmp);
        entries.truncate(capacity);
        Self { entries }
    }

    /// Append an entry, re-sort and keep the best `capacity`.
    ///
    /// Returns the entry's 0-based rank, or `None` if it did not make the cut.
    pub fn record(&mut self, entry: E, capacity: usize) -> Option<usize> {
        // Rank of the new entry: after every entry that is not worse.
        let rank = self
            .entries
            .iter()
            .take_while(|e| e.rank_cmp(&entry) != Ordering::Greater)
            .count();
        self.entries.insert(rank, entry);
        self.entries.truncate(capacity);
        (rank < capacity).then_some(rank)
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry, if any.
    pub fn best(&self) -> Option<&E> {
        self.entries.first()
    }
}

impl<E: Ranked> Default for Leaderboard<E> {
    fn default() -> Self {
        Self::new()
    }
}
