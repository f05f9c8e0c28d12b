//! Lift → translate → drop sequencing of a single move.
//!
//! The sequencer is a pure state machine: the host calls
//! [`MoveAnimation::advance`] once per rendered frame with the frame's delta
//! time and places the mesh at the returned position. The frame that lands
//! the piece carries `completed: true`; that is the only signal a session
//! uses to commit the logical move.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;

/// Point in world space (y is up).
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// Distance in the horizontal (x/z) plane.
    pub fn horizontal_distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Which axis the piece is currently travelling along.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Ascending,
    Translating,
    Descending,
}

/// Result of one [`MoveAnimation::advance`] step.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub position: Vec3,
    /// True on exactly one frame: the one that lands the piece.
    pub completed: bool,
}

/// One in-flight move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveAnimation {
    position: Vec3,
    target: Vec3,
    phase: Phase,
    /// Height the piece travels at; never below either end point.
    lift_height: f32,
    config: AnimationConfig,
    finished: bool,
}

impl MoveAnimation {
    /// The piece rises to the configured lift height, or to the higher of
    /// its two end points if either sits above it.
    pub fn new(start: Vec3, target: Vec3, config: AnimationConfig) -> Self {
        Self {
            position: start,
            target,
            phase: Phase::Ascending,
            lift_height: config.lift_height.max(start.y).max(target.y),
            config,
            finished: false,
        }
    }

    /// Travel at least at `height`, e.g. above the tallest possible stack.
    pub fn with_clearance(mut self, height: f32) -> Self {
        self.lift_height = self.lift_height.max(height);
        self
    }

    /// Height of the translating phase.
    #[inline]
    pub fn lift_height(&self) -> f32 {
        self.lift_height
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// True once the completion frame has been emitted.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt` seconds.
    ///
    /// Only the active phase moves during a frame; leftover time is not
    /// carried into the next phase. Negative or non-finite deltas count as 0.
    pub fn advance(&mut self, dt: f32) -> AnimationFrame {
        if self.finished {
            return AnimationFrame {
                position: self.position,
                completed: false,
            };
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let step = self.config.speed * dt;
        let mut completed = false;

        match self.phase {
            Phase::Ascending => {
                self.position.y += step;
                if self.position.y >= self.lift_height {
                    self.position.y = self.lift_height;
                    self.phase = Phase::Translating;
                }
            }
            Phase::Translating => {
                let dist = self.position.horizontal_distance(self.target);
                if dist > self.config.arrive_epsilon {
                    // Clamped so a step never passes the target.
                    let travel = step.min(dist);
                    self.position.x += (self.target.x - self.position.x) / dist * travel;
                    self.position.z += (self.target.z - self.position.z) / dist * travel;
                }
                if self.position.horizontal_distance(self.target) <= self.config.arrive_epsilon {
                    self.position.x = self.target.x;
                    self.position.z = self.target.z;
                    self.phase = Phase::Descending;
                }
            }
            Phase::Descending => {
                self.position.y -= step;
                if self.position.y <= self.target.y {
                    self.position.y = self.target.y;
                    self.phase = Phase::Ascending;
                    self.finished = true;
                    completed = true;
                }
            }
        }

        AnimationFrame {
            position: self.position,
            completed,
        }
    }
}
