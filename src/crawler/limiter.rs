//! Request pacing
//!
//! The crawler issues one request at a time; the limiter inserts a fixed pause
//! after each outbound call so the source server is never hammered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Fixed-delay rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    pauses: AtomicU64,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pauses: AtomicU64::new(0),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the configured delay
    pub async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Number of pauses taken so far
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }
}
