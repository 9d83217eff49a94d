//! Simulated slow computation.
//!
//! A [`ProgressSequence`] stands in for work whose partial results become
//! observable over time. Each call to `next()` blocks the calling thread
//! for one delay unit and then returns a status line naming how many
//! units are still to go. Callers on an async runtime must drive it from
//! a blocking worker (`tokio::task::spawn_blocking`).

use std::iter::FusedIterator;
use std::time::Duration;

use tracing::trace;

/// Where a [`ProgressSequence`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// Nothing has been emitted yet.
    NotStarted,
    /// `emitted` lines have been produced and more remain.
    Emitting { emitted: u32 },
    /// Every line has been produced. Terminal.
    Done,
}

/// A lazy, finite, one-shot sequence of progress lines.
///
/// Yields exactly `total` lines. The i-th line (0-based) reports
/// `total - i` units to go. Once exhausted it keeps returning `None`;
/// the sequence is consumed by value and cannot be cloned or restarted.
#[derive(Debug)]
pub struct ProgressSequence {
    total: u32,
    emitted: u32,
    unit: Duration,
}

impl ProgressSequence {
    pub fn new(total: u32, unit: Duration) -> Self {
        Self {
            total,
            emitted: 0,
            unit,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of lines not yet produced.
    pub fn remaining(&self) -> u32 {
        self.total - self.emitted
    }

    pub fn state(&self) -> ProgressState {
        if self.emitted >= self.total {
            ProgressState::Done
        } else if self.emitted == 0 {
            ProgressState::NotStarted
        } else {
            ProgressState::Emitting {
                emitted: self.emitted,
            }
        }
    }

    /// Text of the line produced when `remaining` units are still to go.
    pub fn line(remaining: u32) -> String {
        format!("This request is taking a while... still {remaining} seconds to go")
    }
}

impl Iterator for ProgressSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.emitted >= self.total {
            return None;
        }

        std::thread::sleep(self.unit);
        let line = Self::line(self.total - self.emitted);
        self.emitted += 1;
        trace!(emitted = self.emitted, total = self.total, "progress line produced");
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressSequence {}

impl FusedIterator for ProgressSequence {}
