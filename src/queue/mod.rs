//! Bounded Queue Component
//!
//! Bounded, instrumented FIFO queues that connect the stages of a flow
//! processing pipeline, and the pool that names and owns them.
//!
//! # Overview
//!
//! - **Fall-through by default**: a new queue discards what it is given until
//!   the orchestrator finishes wiring and calls `disable_fall_through`
//! - **Backpressure**: in enqueue mode `put` blocks while the queue is full;
//!   `try_put` fails fast with `QueueFull` instead
//! - **Rescue**: consumers re-append items for a retry pass without
//!   inflating the traffic counters
//! - **Statistics**: inbound, outbound and dropped totals plus per-second
//!   rates resampled at most once per second
//! - **System queues**: every pool carries `_metrics`, `_logs`, `_success`
//!   and `_failed`, always in enqueue mode
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  put   ┌─────────────────────────────┐  get   ┌──────────┐
//! │ Producer │ ─────▶ │ Queue  [ 1 │ 2 │ 3 │ ... ]  │ ─────▶ │ Consumer │
//! └──────────┘        │  mode: fall-through/enqueue │        └────┬─────┘
//!                     │  in / out / dropped totals  │ ◀───────────┘
//!                     └─────────────────────────────┘    rescue
//!
//! QueuePool: "_metrics" "_logs" "_success" "_failed" "inbox" ...
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use flowqueue::queue::{QueuePool, FAILED};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let pool: Arc<QueuePool<u64>> = Arc::new(QueuePool::new(100).unwrap());
//! let inbox = pool.create_queue("inbox").unwrap();
//! inbox.disable_fall_through();
//!
//! let producer = {
//!     let inbox = Arc::clone(&inbox);
//!     thread::spawn(move || (0..10).for_each(|n| inbox.put(n)))
//! };
//!
//! let failed = pool.get_queue(FAILED).unwrap();
//! for _ in 0..10 {
//!     let n = inbox.get();
//!     if n % 2 == 1 {
//!         failed.put(n);
//!     }
//! }
//! producer.join().unwrap();
//!
//! assert_eq!(inbox.stats().out_total, 10);
//! assert_eq!(failed.dump().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
//! assert!(pool.join());
//! ```

pub mod api;
mod bounded;
mod dump;
mod error;
mod pool;
mod rate;
mod system;
mod types;

pub use bounded::Queue;
pub use dump::Dump;
pub use error::{QueueError, QueueResult};
pub use pool::QueuePool;
pub use rate::RATE_WINDOW;
pub use system::{is_reserved_name, SystemQueue, FAILED, LOGS, METRICS, RESERVED_PREFIX, SUCCESS};
pub use types::{PutMode, QueueStats};

#[cfg(test)]
mod tests;
