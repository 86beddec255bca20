//! Reserved system queues present in every pool

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Items that failed processing
pub const FAILED: &str = "_failed";
/// Items that completed processing
pub const SUCCESS: &str = "_success";
/// Log records emitted by pipeline stages
pub const LOGS: &str = "_logs";
/// Metric samples emitted by pipeline stages
pub const METRICS: &str = "_metrics";

/// Prefix that marks a queue name as reserved for the framework
pub const RESERVED_PREFIX: char = '_';

/// The four queues every pool creates at construction
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemQueue {
    Metrics,
    Logs,
    Success,
    Failed,
}

impl SystemQueue {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Metrics => METRICS,
            Self::Logs => LOGS,
            Self::Success => SUCCESS,
            Self::Failed => FAILED,
        }
    }

    /// Look up a system queue by its reserved name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|queue| queue.name() == name)
    }

    /// All reserved names, in creation order
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::iter().map(|queue| queue.name())
    }
}

/// True if `name` may not be used for a user queue
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX) || SystemQueue::from_name(name).is_some()
}
