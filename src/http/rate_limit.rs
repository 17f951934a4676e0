//! Sliding-window rate limiter shared by concurrent workers.

use std::{collections::VecDeque, time::Duration};

use tokio::{
    sync::Mutex,
    time::{sleep_until, Instant},
};
use tracing::debug;

/// Allows at most `max_calls` acquisitions within any trailing `period`.
///
/// Timestamps live in a FIFO queue behind an async mutex; the lock is held
/// while waiting so callers are admitted strictly one at a time.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        let max_calls = max_calls.max(1);
        Self {
            max_calls,
            period,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for a free slot in the window and claim it.
    pub async fn acquire(&self) {
        let mut calls = self.calls.lock().await;
        loop {
            let now = Instant::now();
            while calls
                .front()
                .is_some_and(|oldest| now.duration_since(*oldest) >= self.period)
            {
                calls.pop_front();
            }
            if calls.len() < self.max_calls {
                calls.push_back(now);
                return;
            }
            if let Some(oldest) = calls.front().copied() {
                let wake = oldest + self.period;
                debug!(wait_ms = wake.duration_since(now).as_millis() as u64, "rate limit reached");
                sleep_until(wake).await;
            }
        }
    }
}
