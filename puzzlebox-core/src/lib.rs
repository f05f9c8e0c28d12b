//! Puzzle logic core for the puzzlebox games.
//!
//! Each game is a small rules engine plus a session that owns the mutable
//! state the browser front end draws every frame:
//!
//! ```text
//! input ──► validate ──► animate (lift → translate → drop) ──► commit ──► solved? ──► leaderboard
//!                                                                  ▲
//! hint engine (pure, reads a snapshot at any time) ────────────────┘ expires on commit
//! ```
//!
//! # Games
//!
//! - [`hanoi`]: Tower of Hanoi. Two-phase peg selection, animated moves
//!   committed only when the [`animation`] sequencer reports completion, and
//!   an optimal hint engine that works from any legal position.
//! - [`lights`]: Lights Out. Random solvable puzzles, GF(2) solver and hints.
//! - [`sliding`]: the sliding tile puzzle. Inversion-parity solvability and
//!   shuffling by random legal slides.
//!
//! # Time
//!
//! The core never reads a clock. Every command that depends on time takes a
//! [`Millis`] timestamp (milliseconds since the Unix epoch, what JavaScript's
//! `Date.now()` returns) and frame ticks take a delta in seconds.

#[cfg(feature = "wasm")]
pub mod wasm;

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod hanoi;
pub mod leaderboard;
pub mod lights;
pub mod observer;
pub mod persist;
pub mod sliding;

pub use animation::{AnimationFrame, MoveAnimation, Phase, Vec3};
pub use clock::{Millis, RunClock};
pub use config::GameConfig;
pub use error::{ConfigError, StoreError};
pub use leaderboard::{Leaderboard, Ranked};
pub use observer::{Observers, SubscriptionId};
pub use persist::{MemoryStore, SaveStore};

use serde::{Deserialize, Serialize};

/// Lifecycle of a single game.
///
/// `NotStarted → InProgress` on the first committed move, `InProgress → Solved`
/// when a commit produces a solved position. Only a reset leaves `Solved`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Solved,
}

impl GameStatus {
    /// True once the puzzle has been solved.
    #[inline]
    pub fn is_solved(self) -> bool {
        self == GameStatus::Solved
    }
}
