//! Fixed-period heartbeat scheduler for Booster.
//!
//! A heartbeat re-asserts state on the remote side at a fixed cadence so a
//! stateful connection does not silently drop it. This crate provides the
//! timing half: [`HeartbeatScheduler`] decides *when* to beat, [`Backoff`]
//! decides how long to wait after a failed beat. What a beat *does* is up
//! to the caller.
//!
//! # Disabled mode
//!
//! When the interval is zero, the scheduler is disabled and
//! [`HeartbeatScheduler::wait_for_beat`] pends forever.
//!
//! # Integration
//!
//! The scheduler sits inside a `tokio::select!` loop next to a
//! cancellation branch:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = cancel.cancelled() => break,
//!         _ = scheduler.wait_for_beat() => {
//!             if declare().await.is_err() {
//!                 scheduler.retry_after(backoff.next_delay());
//!             } else {
//!                 backoff.reset();
//!             }
//!         }
//!     }
//! }
//! ```

mod backoff;

pub use backoff::Backoff;

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Heartbeat cadence and failure backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Time between beats. Zero disables heartbeating.
    pub interval: Duration,
    /// First retry delay after a failed beat.
    pub backoff_min: Duration,
    /// Upper bound for the retry delay.
    pub backoff_max: Duration,
    /// Add up to 10% random delay to each retry.
    pub backoff_jitter: bool,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            backoff_min: Duration::from_secs(5),
            backoff_max: Duration::from_secs(300),
            backoff_jitter: true,
        }
    }
}

impl HeartbeatConfig {
    /// Smallest retry delay the scheduler will use.
    pub const MIN_BACKOFF: Duration = Duration::from_secs(1);

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// - `backoff_min` raised to [`Self::MIN_BACKOFF`].
    /// - `backoff_max` raised to `backoff_min`.
    pub fn validated(mut self) -> Self {
        if self.backoff_min < Self::MIN_BACKOFF {
            warn!(
                backoff_min_ms = self.backoff_min.as_millis() as u64,
                "backoff_min below 1s, raising"
            );
            self.backoff_min = Self::MIN_BACKOFF;
        }
        if self.backoff_max < self.backoff_min {
            warn!(
                backoff_min_ms = self.backoff_min.as_millis() as u64,
                backoff_max_ms = self.backoff_max.as_millis() as u64,
                "backoff_max below backoff_min, raising"
            );
            self.backoff_max = self.backoff_min;
        }
        self
    }

    /// Whether heartbeating is turned off.
    pub fn is_disabled(&self) -> bool {
        self.interval.is_zero()
    }

    /// A scheduler for this config's interval.
    pub fn scheduler(&self) -> HeartbeatScheduler {
        HeartbeatScheduler::new(self.interval)
    }

    /// A fresh backoff for this config's retry bounds.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.backoff_min, self.backoff_max).with_jitter(self.backoff_jitter)
    }
}

// ---------------------------------------------------------------------------
// Beat info
// ---------------------------------------------------------------------------

/// Information about a beat, returned by [`HeartbeatScheduler::wait_for_beat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatInfo {
    /// Monotonically increasing beat number (starts at 1).
    pub beat: u64,
    /// Whole intervals missed because the beat woke up late, e.g. after
    /// the host was suspended.
    pub beats_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period heartbeat scheduler.
///
/// The first beat is due one full interval after construction, so a beat
/// never immediately follows whatever triggered the scheduler's creation.
pub struct HeartbeatScheduler {
    interval: Option<Duration>,
    beat_count: u64,
    next_beat: Option<Instant>,
}

impl HeartbeatScheduler {
    /// Create a scheduler. A zero `interval` creates a disabled scheduler.
    pub fn new(interval: Duration) -> Self {
        let interval = (!interval.is_zero()).then_some(interval);
        let next_beat = interval.map(|d| Instant::now() + d);

        match interval {
            Some(d) => debug!(interval_ms = d.as_millis() as u64, "heartbeat scheduler created"),
            None => debug!("heartbeat scheduler created in disabled mode"),
        }

        Self {
            interval,
            beat_count: 0,
            next_beat,
        }
    }

    /// Wait until the next beat is due.
    ///
    /// In disabled mode this future never resolves; `tokio::select!`
    /// still drives the other branches.
    pub async fn wait_for_beat(&mut self) -> BeatInfo {
        let (next, interval) = match (self.next_beat, self.interval) {
            (Some(next), Some(interval)) => (next, interval),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.beat_count += 1;

        let late_by = now.saturating_duration_since(next);
        let beats_skipped = (late_by.as_nanos() / interval.as_nanos()) as u64;

        // Always from now, never from the missed deadline.
        self.next_beat = Some(now + interval);

        trace!(beat = self.beat_count, beats_skipped, "heartbeat fired");

        BeatInfo {
            beat: self.beat_count,
            beats_skipped,
        }
    }

    /// Bring the next beat forward (or push it back) to `now + delay`.
    ///
    /// No-op in disabled mode.
    pub fn retry_after(&mut self, delay: Duration) {
        if self.interval.is_some() {
            self.next_beat = Some(Instant::now() + delay);
            debug!(
                beat = self.beat_count,
                delay_ms = delay.as_millis() as u64,
                "heartbeat retry scheduled"
            );
        }
    }
}
