use std::time::{Duration, Instant};

/// Trailing-edge debouncer.
///
/// Each [`schedule`](Self::schedule) pushes the deadline out to `now + wait`.
/// [`fire_if_due`](Self::fire_if_due) returns `true` exactly once after the burst
/// has been quiet for `wait`, so only the final state of a burst is acted on.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self { wait, deadline: None }
    }

    #[inline]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Records activity at `now`, restarting the quiet window.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline, `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns `true` (and goes idle) when a pending deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops any pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
