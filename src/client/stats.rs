//! Request timing statistics shared by all clients of a test run

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Point-in-time copy of [`RequestStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub total_time: Duration,
    pub total_requests: u64,
}

impl StatsSnapshot {
    /// Mean request duration; zero requests count as one
    pub fn average(&self) -> Duration {
        let count = u32::try_from(self.total_requests.max(1)).unwrap_or(u32::MAX);
        self.total_time / count
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seconds({:.3})/Requests({}): {:.3}",
            self.total_time.as_secs_f64(),
            self.total_requests,
            self.average().as_secs_f64()
        )
    }
}

/// Accumulated request count and duration
#[derive(Debug, Default)]
pub struct RequestStats {
    inner: Mutex<StatsSnapshot>,
}

impl RequestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, duration: Duration) {
        let mut stats = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        stats.total_time += duration;
        stats.total_requests += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = StatsSnapshot::default();
    }
}
