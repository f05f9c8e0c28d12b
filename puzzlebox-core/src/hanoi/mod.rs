//! Tower of Hanoi.
//!
//! - [`pegs`]: board representation and move legality
//! - [`solver`]: optimal move sequences and the hint engine
//! - [`layout`]: where pegs and disks sit in world space
//! - [`session`]: the interactive game

pub mod layout;
pub mod pegs;
pub mod session;
pub mod solver;

pub use pegs::{Disk, InvalidMove, InvalidPegs, MoveRecord, MoveRejected, Pegs, GOAL_PEG, PEG_COUNT, START_PEG};
pub use session::{DiskFrame, HanoiEvent, HanoiGame, HanoiSave, HanoiScore, HanoiSnapshot, Selection};
pub use solver::{min_moves, next_optimal_move, optimal_moves, solution_from, starting_solution};
