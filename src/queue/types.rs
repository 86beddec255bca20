//! Type definitions for the queue system
//!
//! Put-mode selection and the statistics snapshot returned by `Queue::stats`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// How `put` treats incoming items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PutMode {
    /// Discard every item and count it as dropped
    FallThrough,
    /// Buffer items subject to the queue capacity
    Enqueue,
}

impl fmt::Display for PutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutMode::FallThrough => write!(f, "fall-through"),
            PutMode::Enqueue => write!(f, "enqueue"),
        }
    }
}

/// Point-in-time statistics for one queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStats {
    /// Items currently buffered
    pub size: usize,
    /// Items accepted by `put` in enqueue mode
    pub in_total: u64,
    /// Items handed out by `get`
    pub out_total: u64,
    /// Items discarded by `put` in fall-through mode
    pub dropped_total: u64,
    /// Items per second over the latest sampling window
    pub in_rate: f64,
    pub out_rate: f64,
    pub dropped_rate: f64,
    /// When the snapshot was taken
    pub sampled_at: DateTime<Utc>,
}
