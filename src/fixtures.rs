//! Unique test data
//!
//! Registration tests need phone numbers and usernames that have not been
//! used before. [`SequenceGenerator`] hands out values from one counter
//! seeded from the clock, so consecutive test runs do not collide.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Subtracted from the current Unix time to get the starting seed
pub const SEED_EPOCH: u64 = 1_600_000_000;

/// Thread-safe counter for generated test identities
#[derive(Debug)]
pub struct SequenceGenerator {
    next: Mutex<u64>,
}

impl SequenceGenerator {
    /// Start at seconds elapsed since [`SEED_EPOCH`]
    pub fn from_clock() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        Self::with_seed(now.saturating_sub(SEED_EPOCH))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { next: Mutex::new(seed) }
    }

    fn advance(&self) -> u64 {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        *next += 1;
        *next
    }

    /// Phone number of the form `130XXXXXXXX`
    pub fn next_tel(&self) -> String {
        format!("130{:08}", self.advance())
    }

    /// Username of the form `user-XXXXXXXX`
    pub fn next_username(&self) -> String {
        format!("user-{:08}", self.advance())
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::from_clock()
    }
}
