//! Double-submit guard for turn actions
//!
//! A submission holds the debouncer until the window passes. Clients also
//! release it early when the host's next state update answers them.
//! Time is passed in so sessions and tests control the clock.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct ActionDebouncer {
    window: Duration,
    last: Option<Instant>,
    pending: bool,
}

impl ActionDebouncer {
    pub fn new(window: Duration) -> Self {
        ActionDebouncer {
            window,
            last: None,
            pending: false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Claim the guard for a submission at `now`
    ///
    /// Fails only while an earlier submission is pending and still inside
    /// the window.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.is_blocked(now) {
            return false;
        }
        self.last = Some(now);
        self.pending = true;
        true
    }

    pub fn is_blocked(&self, now: Instant) -> bool {
        match self.last {
            Some(last) if self.pending => now.saturating_duration_since(last) < self.window,
            _ => false,
        }
    }

    /// Time left before a new submission is accepted
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) if self.pending => self.window.saturating_sub(now.saturating_duration_since(last)),
            _ => Duration::ZERO,
        }
    }

    /// The pending submission has been answered
    pub fn release(&mut self) {
        self.pending = false;
    }
}

impl Default for ActionDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}
