//! Exponential retry backoff.

use std::time::Duration;

use rand::Rng;

/// Doubling retry delay, bounded by `min` and `max`.
///
/// The first [`next_delay`](Self::next_delay) after construction or
/// [`reset`](Self::reset) returns `min`; each following call doubles the
/// previous delay until it reaches `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    min: Duration,
    max: Duration,
    jitter: bool,
    current: Option<Duration>,
    attempts: u32,
}

impl Backoff {
    /// Creates a backoff without jitter. `max` below `min` is raised to `min`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
            jitter: false,
            current: None,
            attempts: 0,
        }
    }

    /// Enables or disables up to 10% extra random delay per retry.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay to wait before the next retry.
    pub fn next_delay(&mut self) -> Duration {
        let base = match self.current {
            None => self.min,
            Some(prev) => prev.saturating_mul(2).min(self.max),
        };
        self.current = Some(base);
        self.attempts = self.attempts.saturating_add(1);

        if self.jitter {
            let max_extra_ms = (base.as_millis() / 10) as u64;
            let extra_ms = rand::rng().random_range(0..=max_extra_ms);
            base + Duration::from_millis(extra_ms)
        } else {
            base
        }
    }

    /// Back to `min` after a success.
    pub fn reset(&mut self) {
        self.current = None;
        self.attempts = 0;
    }

    /// Retries handed out since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_next_delay_doubles_until_max() {
        let mut b = Backoff::new(secs(5), secs(30));
        let delays: Vec<_> = (0..5).map(|_| b.next_delay()).collect();
        assert_eq!(delays, vec![secs(5), secs(10), secs(20), secs(30), secs(30)]);
        assert_eq!(b.attempts(), 5);
    }

    #[test]
    fn test_reset_returns_to_min() {
        let mut b = Backoff::new(secs(2), secs(60));
        b.next_delay();
        b.next_delay();
        b.reset();
        assert_eq!(b.attempts(), 0);
        assert_eq!(b.next_delay(), secs(2));
    }

    #[test]
    fn test_max_below_min_is_raised() {
        let mut b = Backoff::new(secs(10), secs(1));
        assert_eq!(b.next_delay(), secs(10));
        assert_eq!(b.next_delay(), secs(10));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let mut b = Backoff::new(secs(10), secs(10)).with_jitter(true);
        for _ in 0..50 {
            let d = b.next_delay();
            assert!(d >= secs(10));
            assert!(d <= secs(11), "jittered delay {d:?} exceeds 10%");
        }
    }
}
