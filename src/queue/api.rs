//! Public API for the queue system
//!
//! External modules should import from here rather than from the
//! individual queue modules.

// Core queue components
pub use crate::queue::bounded::Queue;
pub use crate::queue::dump::Dump;
pub use crate::queue::pool::QueuePool;

// Reserved system queues
pub use crate::queue::system::{SystemQueue, FAILED, LOGS, METRICS, SUCCESS};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Statistics and modes
pub use crate::queue::types::{PutMode, QueueStats};

// Configuration
pub use crate::core::config::PoolConfig;
