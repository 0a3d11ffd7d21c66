//! # Exponential Backoff
//!
//! Provides the doubling backoff used for the metadata self-stack lookup.
//! The sequence starts at the initial delay and doubles until the next delay
//! would reach the ceiling, at which point the caller gives up and degrades
//! rather than waiting forever: delays of 1s, 2s, 4s, 8s, 16s against a 30s
//! ceiling, then exhaustion.

use std::time::Duration;

/// Doubling backoff with a hard ceiling
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial: Duration,
    current: Duration,
    ceiling: Duration,
}

impl ExponentialBackoff {
    /// Create a new backoff starting at `initial`, exhausted once the delay
    /// reaches `ceiling`.
    #[must_use]
    pub fn new(initial: Duration, ceiling: Duration) -> Self {
        Self {
            initial,
            current: initial,
            ceiling,
        }
    }

    /// Get the next delay and advance the sequence.
    ///
    /// Returns `None` once the sequence has passed the ceiling, signalling
    /// the caller to stop retrying.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.current >= self.ceiling {
            return None;
        }
        let delay = self.current;
        self.current *= 2;
        Some(delay)
    }

    /// Reset the backoff to the initial state.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
