//! Timers owned by the components that arm them
//!
//! There is no background scheduler: each timer is a plain value polled with the
//! current `Instant`. Dropping the owner drops the timer, so nothing can fire
//! after a component is gone.

use std::time::{Duration, Instant};

/// One-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Arm a timer that becomes due `delay` after `now`
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    /// Check if the timer has elapsed
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }

}

/// Trailing-edge debouncer
///
/// Each `schedule` replaces the pending value and restarts the window; `poll`
/// hands the value out once the window passes without another `schedule`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Deadline)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queue a value, restarting the window
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, Deadline::after(now, self.delay)));
    }

    /// Take the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if deadline.is_due(now) => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop the pending value without delivering it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline() {
        let now = Instant::now();
        let deadline = Deadline::after(now, Duration::from_millis(100));
        assert!(!deadline.is_due(now));
        assert!(!deadline.is_due(now + Duration::from_millis(99)));
        assert!(deadline.is_due(now + Duration::from_millis(100)));
        assert!(deadline.is_due(now + Duration::from_millis(150)));
    }

    #[test]
    fn test_debouncer_delivers_after_quiet_window() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule(1, now);

        assert_eq!(debouncer.poll(now + Duration::from_millis(49)), None);
        assert_eq!(debouncer.poll(now + Duration::from_millis(50)), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(now + Duration::from_millis(100)), None);
    }

    #[test]
    fn test_debouncer_restarts_window() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule(1, now);
        debouncer.schedule(2, now + Duration::from_millis(30));

        // First window would have closed here, but it was restarted
        assert_eq!(debouncer.poll(now + Duration::from_millis(60)), None);
        assert_eq!(debouncer.poll(now + Duration::from_millis(80)), Some(2));
    }

    #[test]
    fn test_debouncer_cancel() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule("a", now);
        debouncer.cancel();
        assert_eq!(debouncer.poll(now + Duration::from_secs(1)), None);
        assert!(!debouncer.is_pending());
    }
}
