//! Timestamps and run timing.

use chrono::{DateTime, SecondsFormat, Utc};

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

/// Timing of one play-through.
///
/// The clock starts on the first committed move, not when the board is
/// dealt, so idle time before the first move is never counted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RunClock {
    started_at: Option<Millis>,
}

impl RunClock {
    /// A clock that has not started yet.
    pub fn new() -> Self {
        Self { started_at: None }
    }

    /// Start the clock if it is not already running.
    pub fn start(&mut self, now: Millis) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// When the clock was started.
    #[inline]
    pub fn started_at(&self) -> Option<Millis> {
        self.started_at
    }

    /// Elapsed seconds at `now`, or `None` if the clock never started.
    pub fn elapsed_secs(&self, now: Millis) -> Option<f64> {
        self.started_at
            .map(|start| now.saturating_sub(start) as f64 / 1000.0)
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Format `now` as an RFC 3339 UTC timestamp with millisecond precision,
/// e.g. `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp(now: Millis) -> String {
    i64::try_from(now)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
