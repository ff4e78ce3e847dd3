//! Smooth scroll animation between slide offsets

use std::time::{Duration, Instant};

/// Ease-out tween from one offset to another
#[derive(Debug, Clone, Copy)]
pub struct SmoothScroll {
    from: f64,
    to: f64,
    started_at: Instant,
    duration: Duration,
}

impl SmoothScroll {
    pub fn new(from: f64, to: f64, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Offset at `now`, landing exactly on the target once finished
    pub fn offset_at(&self, now: Instant) -> f64 {
        if self.is_finished(now) {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started_at).as_secs_f64()
            / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_out_cubic(t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.duration.is_zero() || now.saturating_duration_since(self.started_at) >= self.duration
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progresses_monotonically_to_target() {
        let start = Instant::now();
        let motion = SmoothScroll::new(600.0, 0.0, start, Duration::from_millis(300));

        assert_eq!(motion.offset_at(start), 600.0);
        let mut last = 600.0;
        for ms in (16..300).step_by(16) {
            let offset = motion.offset_at(start + Duration::from_millis(ms));
            assert!(offset <= last);
            last = offset;
        }
        assert!(motion.is_finished(start + Duration::from_millis(300)));
        assert_eq!(motion.offset_at(start + Duration::from_millis(300)), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let start = Instant::now();
        let motion = SmoothScroll::new(0.0, 300.0, start, Duration::ZERO);
        assert!(motion.is_finished(start));
        assert_eq!(motion.offset_at(start), 300.0);
    }
}
