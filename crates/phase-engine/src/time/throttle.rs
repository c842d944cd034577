use std::time::{Duration, Instant};

/// Leading-edge throttle: accepts a trigger, then rejects further ones until
/// `interval` has elapsed since the last accepted trigger.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time until the next trigger would be accepted (zero when ready).
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Accepts the trigger at `now` if the interval has elapsed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.remaining(now) > Duration::ZERO {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Forgets the last accepted trigger.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_trigger_is_accepted() {
        let mut t = Throttle::new(Duration::from_secs(1));
        assert!(t.try_acquire(Instant::now()));
    }

    #[test]
    fn rejects_inside_interval() {
        let t0 = Instant::now();
        let mut t = Throttle::new(Duration::from_secs(1));
        assert!(t.try_acquire(t0));
        assert!(!t.try_acquire(t0 + Duration::from_millis(999)));
        assert_eq!(t.remaining(t0 + Duration::from_millis(400)), Duration::from_millis(600));
        assert!(t.try_acquire(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn rejected_trigger_does_not_extend_window() {
        let t0 = Instant::now();
        let mut t = Throttle::new(Duration::from_secs(1));
        t.try_acquire(t0);
        t.try_acquire(t0 + Duration::from_millis(800));
        assert!(t.try_acquire(t0 + Duration::from_millis(1000)));
    }
}
