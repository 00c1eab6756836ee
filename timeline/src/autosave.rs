//! Coalescing timer for drawing and note saves.
//!
//! A `Debouncer` holds at most one deadline. Every new edit pushes the
//! deadline out by the quiet period, so a burst of edits produces a single
//! write once the user pauses. Callers poll it with the current time; it
//! never sleeps or spawns anything itself.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None }
    }

    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record an edit at `now`. Resets any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Drop the pending write. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the quiet period has elapsed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Consume the pending write if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            return true;
        }
        false
    }

    /// Consume the pending write regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        self.cancel()
    }
}
