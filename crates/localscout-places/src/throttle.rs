//! Per-search outbound pacing.
//!
//! Every nearby query is followed by a fixed pause, whether it succeeded or
//! not, so one search never bursts the upstream quota. A throttle belongs to
//! a single search; concurrent searches each own their own.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct QueryThrottle {
    delay: Duration,
    completed: usize,
}

impl QueryThrottle {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            completed: 0,
        }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Record a finished query and wait out the configured delay.
    pub async fn after_query(&mut self) {
        self.completed += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Queries recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Pause applied after each query.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Lower bound on the time spent pacing `queries` queries.
    #[must_use]
    pub fn minimum_pacing(&self, queries: usize) -> Duration {
        self.delay
            .saturating_mul(u32::try_from(queries).unwrap_or(u32::MAX))
    }
}
