//! Timing utilities for capture sessions.
//!
//! - [`DelayTimer`]: a cooperative, cancellable one-shot timer polled from
//!   the UI loop (no background thread).
//! - [`CaptureNamer`]: timestamped screenshot file names that stay unique
//!   for several captures inside the same second.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

/// One-shot timer driven by explicit `now` values.
#[derive(Debug, Clone, Default)]
pub struct DelayTimer {
    deadline: Option<Instant>,
}

impl DelayTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, replacing any previous deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm the timer. Returns true if it was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether the deadline has been reached.
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Time left until the deadline, or `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// The pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Generates `<prefix>_YYYYMMDD_HHMMSS[_N].png` paths.
#[derive(Debug, Clone)]
pub struct CaptureNamer {
    prefix: String,
    extension: String,
    last_stamp: Option<String>,
    sequence: u32,
}

impl CaptureNamer {
    /// Create a namer producing PNG file names with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: "png".to_string(),
            last_stamp: None,
            sequence: 0,
        }
    }

    /// Next free path inside `folder` for a capture taken at `now`.
    ///
    /// Captures within the same second get increasing `_N` suffixes; a name
    /// already present on disk is skipped as well.
    pub fn next_path(&mut self, folder: &Path, now: NaiveDateTime) -> PathBuf {
        let stamp = now.format("%Y%m%d_%H%M%S").to_string();
        if self.last_stamp.as_deref() == Some(stamp.as_str()) {
            self.sequence += 1;
        } else {
            self.sequence = 0;
            self.last_stamp = Some(stamp.clone());
        }

        loop {
            let path = folder.join(self.file_name(&stamp, self.sequence));
            if !path.exists() {
                return path;
            }
            self.sequence += 1;
        }
    }

    fn file_name(&self, stamp: &str, sequence: u32) -> String {
        if sequence == 0 {
            format!("{}_{}.{}", self.prefix, stamp, self.extension)
        } else {
            format!("{}_{}_{}.{}", self.prefix, stamp, sequence, self.extension)
        }
    }
}

impl Default for CaptureNamer {
    fn default() -> Self {
        Self::new("screenshot")
    }
}
