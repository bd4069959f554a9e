//! Debounce timer for coalescing bursts of edits into a single refresh.
//!
//! Arming an already-armed timer pushes its deadline out, so a refresh only
//! becomes due once input has been quiet for the whole window.

use std::time::{Duration, Instant};

/// Default delay after the last edit before a highlight pass runs
pub const DEFAULT_EDIT_DEBOUNCE_MS: u64 = 500;

/// Default delay for the first highlight pass after a document is created
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, Default)]
pub struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the timer to fire `delay` after `now`
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed, disarming the timer
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
