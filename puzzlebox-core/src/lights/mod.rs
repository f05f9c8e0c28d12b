//! Lights Out.
//!
//! Pressing a cell flips it and its orthogonal neighbours; the goal is to
//! turn every light off. Puzzles are generated by scrambling a solved grid,
//! so they are always solvable, and [`solver`] finds the shortest solution
//! for any board that has one.

pub mod board;
pub mod session;
pub mod solver;

pub use board::{Cell, InvalidBoard, LightsBoard, PressRejected};
pub use session::{LightsEvent, LightsGame, LightsSave, LightsScore, LightsSnapshot};
pub use solver::LightsSolver;
