//! Clock abstraction used by rate sampling
//!
//! Queue throughput rates are computed over wall-clock windows of at least
//! one second. Reading the clock through [`TimeProvider`] lets tests step time
//! forward instead of sleeping.

use chrono::{DateTime, Utc};
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;
use std::time::Instant;

/// Source of monotonic and wall-clock time
pub trait TimeProvider: Send + Sync {
    /// Monotonic time, used for rate windows
    fn now(&self) -> Instant;

    /// Wall-clock time, used to stamp statistics snapshots
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Production time provider backed by the system clocks
#[derive(Debug, Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic rate tests
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    instant: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<DateTime<Utc>>>,
}

#[cfg(test)]
impl MockTimeProvider {
    pub fn new() -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(Utc::now())),
        }
    }

    /// Move both clocks forward by `duration`
    pub fn advance(&self, duration: Duration) {
        *self.instant.lock().unwrap() += duration;
        let mut utc = self.utc.lock().unwrap();
        *utc += chrono::Duration::from_std(duration).unwrap();
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        *self.instant.lock().unwrap()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        *self.utc.lock().unwrap()
    }
}
