//! Error types shared across the games.
//!
//! Move rejections live next to the rules that produce them
//! ([`crate::hanoi::MoveRejected`], [`crate::lights::PressRejected`],
//! [`crate::sliding::SlideRejected`]). None of them are fatal: the sessions
//! turn them into "do nothing" (plus a selection clear for Hanoi).

use thiserror::Error;

/// Invalid configuration or difficulty parameter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} {value} is outside the supported range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{name} range is empty: min {min} > max {max}")]
    EmptyRange {
        name: &'static str,
        min: u32,
        max: u32,
    },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

impl ConfigError {
    /// Check that `value` lies in `min..=max`.
    pub fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { name, value, min, max })
        }
    }
}

/// Failure reading or writing persisted game data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be encoded or decoded.
    #[error("invalid persisted data: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("disk count", 3, 3, 7).is_ok());
        assert!(ConfigError::check_range("disk count", 7, 3, 7).is_ok());
        assert_eq!(
            ConfigError::check_range("disk count", 8, 3, 7),
            Err(ConfigError::OutOfRange { name: "disk count", value: 8, min: 3, max: 7 })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::OutOfRange { name: "grid size", value: 9, min: 3, max: 7 };
        assert_eq!(err.to_string(), "grid size 9 is outside the supported range 3..=7");
    }
}
