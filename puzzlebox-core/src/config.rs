//! Tunable parameters for every game.
//!
//! All fields have defaults, so a partial JSON document such as
//! `{"hanoi": {"max_disks": 5}}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hanoi::Pegs;
use crate::leaderboard::DEFAULT_CAPACITY;

/// Configuration for all games.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hanoi: HanoiConfig,
    pub lights: LightsConfig,
    pub sliding: SlidingConfig,
}

impl GameConfig {
    /// Check every section for inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hanoi.validate()?;
        self.lights.validate()?;
        self.sliding.validate()
    }
}

/// Tower of Hanoi parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HanoiConfig {
    pub min_disks: u8,
    pub max_disks: u8,
    /// Disk count of a fresh install (before anything is persisted).
    pub default_disks: u8,
    /// How long a hint stays visible.
    pub hint_duration_ms: u64,
    pub leaderboard_capacity: usize,
    pub animation: AnimationConfig,
}

impl HanoiConfig {
    /// Hard ceiling on any disk count, the one [`Pegs`] supports.
    pub const MAX_SUPPORTED_DISKS: u8 = Pegs::MAX_DISKS;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_disks > self.max_disks {
            return Err(ConfigError::EmptyRange {
                name: "disk count",
                min: self.min_disks.into(),
                max: self.max_disks.into(),
            });
        }
        ConfigError::check_range("minimum disk count", self.min_disks.into(), 1, Self::MAX_SUPPORTED_DISKS.into())?;
        ConfigError::check_range("maximum disk count", self.max_disks.into(), 1, Self::MAX_SUPPORTED_DISKS.into())?;
        ConfigError::check_range(
            "default disk count",
            self.default_disks.into(),
            self.min_disks.into(),
            self.max_disks.into(),
        )?;
        self.animation.validate()
    }

    /// Check a requested disk count against the configured bounds.
    pub fn check_disks(&self, disks: u8) -> Result<(), ConfigError> {
        ConfigError::check_range("disk count", disks.into(), self.min_disks.into(), self.max_disks.into())
    }
}

impl Default for HanoiConfig {
    fn default() -> Self {
        Self {
            min_disks: 3,
            max_disks: 7,
            default_disks: 3,
            hint_duration_ms: 3_000,
            leaderboard_capacity: DEFAULT_CAPACITY,
            animation: AnimationConfig::default(),
        }
    }
}

/// Motion parameters of the lift → translate → drop sequence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Units per second on every axis.
    pub speed: f32,
    /// Height the disk is lifted to before it travels sideways.
    pub lift_height: f32,
    /// Horizontal distance under which the disk snaps onto its target.
    pub arrive_epsilon: f32,
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("animation speed", self.speed),
            ("lift height", self.lift_height),
            ("arrive epsilon", self.arrive_epsilon),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value: value.into() });
            }
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            lift_height: 4.0,
            arrive_epsilon: 0.05,
        }
    }
}

/// Lights Out parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub min_size: u8,
    pub max_size: u8,
    pub default_size: u8,
    /// Random presses used to scramble a level-0 board.
    pub base_scramble: u32,
    /// Extra random presses per level.
    pub scramble_per_level: u32,
    pub leaderboard_capacity: usize,
}

impl LightsConfig {
    /// Boards are packed into a `u64`.
    pub const MAX_SUPPORTED_SIZE: u8 = 8;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size > self.max_size {
            return Err(ConfigError::EmptyRange {
                name: "grid size",
                min: self.min_size.into(),
                max: self.max_size.into(),
            });
        }
        ConfigError::check_range("minimum grid size", self.min_size.into(), 1, Self::MAX_SUPPORTED_SIZE.into())?;
        ConfigError::check_range("maximum grid size", self.max_size.into(), 1, Self::MAX_SUPPORTED_SIZE.into())?;
        ConfigError::check_range(
            "default grid size",
            self.default_size.into(),
            self.min_size.into(),
            self.max_size.into(),
        )
    }

    pub fn check_size(&self, size: u8) -> Result<(), ConfigError> {
        ConfigError::check_range("grid size", size.into(), self.min_size.into(), self.max_size.into())
    }

    /// Number of scramble presses for a level (levels start at 1).
    pub fn scramble_presses(&self, level: u32) -> u32 {
        self.base_scramble
            .saturating_add(self.scramble_per_level.saturating_mul(level))
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 7,
            default_size: 3,
            base_scramble: 3,
            scramble_per_level: 2,
            leaderboard_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Sliding puzzle parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingConfig {
    pub min_size: u8,
    pub max_size: u8,
    pub default_size: u8,
    /// Random slides applied when shuffling.
    pub shuffle_moves: u32,
    pub leaderboard_capacity: usize,
}

impl SlidingConfig {
    /// Tiles are stored as `u8`.
    pub const MAX_SUPPORTED_SIZE: u8 = 15;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size > self.max_size {
            return Err(ConfigError::EmptyRange {
                name: "puzzle size",
                min: self.min_size.into(),
                max: self.max_size.into(),
            });
        }
        ConfigError::check_range("minimum puzzle size", self.min_size.into(), 2, Self::MAX_SUPPORTED_SIZE.into())?;
        ConfigError::check_range("maximum puzzle size", self.max_size.into(), 2, Self::MAX_SUPPORTED_SIZE.into())?;
        ConfigError::check_range(
            "default puzzle size",
            self.default_size.into(),
            self.min_size.into(),
            self.max_size.into(),
        )
    }

    pub fn check_size(&self, size: u8) -> Result<(), ConfigError> {
        ConfigError::check_range("puzzle size", size.into(), self.min_size.into(), self.max_size.into())
    }
}

impl Default for SlidingConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 5,
            default_size: 3,
            shuffle_moves: 200,
            leaderboard_capacity: DEFAULT_CAPACITY,
        }
    }
}
