//! Per-counter throughput sampling
//!
//! A rate is recomputed at most once per second. Between samples the last
//! computed value is returned unchanged, so sub-second reads do not jitter.

use std::time::{Duration, Instant};

/// Minimum window between two rate samples
pub const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Last sample and last computed rate for a single counter
#[derive(Debug, Clone, Default)]
pub(crate) struct RateTracker {
    last_sample: Option<(Instant, u64)>,
    rate: f64,
}

impl RateTracker {
    /// Feed the counter's current value and return its rate in items/second
    pub(crate) fn sample(&mut self, now: Instant, value: u64) -> f64 {
        let (sampled_at, sampled_value) = match self.last_sample {
            Some(sample) => sample,
            None => {
                self.last_sample = Some((now, value));
                return 0.0;
            }
        };

        let elapsed = now.saturating_duration_since(sampled_at);
        if elapsed < RATE_WINDOW {
            return self.rate;
        }

        self.rate = value.saturating_sub(sampled_value) as f64 / elapsed.as_secs_f64();
        self.last_sample = Some((now, value));
        self.rate
    }
}

/// Rate trackers for the three queue counters
#[derive(Debug, Clone, Default)]
pub(crate) struct QueueRates {
    pub(crate) inbound: RateTracker,
    pub(crate) outbound: RateTracker,
    pub(crate) dropped: RateTracker,
}
