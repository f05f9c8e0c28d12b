//! Sliding tile puzzle.
//!
//! Tiles `1..size²` sit on a square board with one gap; a tile next to the
//! gap slides into it. Boards are shuffled by random legal slides, so they
//! are always solvable.

pub mod board;
pub mod session;

pub use board::{InvalidTiles, SlideRecord, SlideRejected, SlidingBoard, Tile, BLANK};
pub use session::{SlidingEvent, SlidingGame, SlidingSave, SlidingScore, SlidingSnapshot};
