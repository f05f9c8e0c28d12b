//! Offline tools for puzzlebox: the Lights Out census and its checkpoints.

pub mod census;
pub mod checkpoint;
pub mod stats;
