//! QueuePool - named collection of queues for one pipeline
//!
//! The pool owns every queue a pipeline uses. It is created once by the
//! orchestrator, which creates queues by name and hands `Arc<Queue<T>>`
//! handles to the producer and consumer sides at wiring time.

use crate::core::config::PoolConfig;
use crate::core::sync::{read_or_recover, write_or_recover};
use crate::queue::bounded::Queue;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::system::{is_reserved_name, SystemQueue};
use crate::queue::types::QueueStats;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use strum::IntoEnumIterator;

/// Named queues sharing one capacity setting
///
/// Four system queues (`_metrics`, `_logs`, `_success`, `_failed`) exist from
/// construction onwards. They are always in enqueue mode so nothing routed to
/// them is dropped. User queues start in fall-through mode like any new
/// [`Queue`].
///
/// # Thread Safety
///
/// The pool can be shared as `Arc<QueuePool<T>>`; the name map sits behind an
/// `RwLock` and each queue synchronises itself.
///
/// # Example
///
/// ```rust
/// use flowqueue::queue::{QueuePool, SUCCESS};
///
/// let pool: QueuePool<String> = QueuePool::new(10).unwrap();
/// let inbox = pool.create_queue("inbox").unwrap();
/// inbox.disable_fall_through();
/// inbox.put("hello".to_string());
///
/// pool.get_queue(SUCCESS).unwrap().put(inbox.get());
/// assert!(inbox.is_empty());
/// ```
pub struct QueuePool<T> {
    config: PoolConfig,
    queues: RwLock<BTreeMap<String, Arc<Queue<T>>>>,
}

impl<T> QueuePool<T> {
    /// Create a pool whose queues hold at most `size` items each
    pub fn new(size: usize) -> QueueResult<Self> {
        Self::with_config(PoolConfig::with_size(size))
    }

    /// Create a pool from loaded configuration
    pub fn with_config(config: PoolConfig) -> QueueResult<Self> {
        config
            .validate()
            .map_err(|e| QueueError::InvalidArgument {
                message: e.to_string(),
            })?;

        let pool = Self {
            config,
            queues: RwLock::new(BTreeMap::new()),
        };

        for system_queue in SystemQueue::iter() {
            let queue = pool.create_system_queue(system_queue.name())?;
            queue.disable_fall_through();
        }

        log::debug!("Created queue pool (queue size {})", pool.config.size);
        Ok(pool)
    }

    /// Capacity applied to every queue in this pool
    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Create a user queue in fall-through mode
    ///
    /// Names starting with `_` are reserved for the framework.
    pub fn create_queue(&self, name: &str) -> QueueResult<Arc<Queue<T>>> {
        if is_reserved_name(name) {
            return Err(QueueError::ReservedName {
                name: name.to_string(),
            });
        }
        self.insert_queue(name)
    }

    /// Create a queue without the reserved-name check
    ///
    /// For framework use only. Never pass unvalidated user input here: it
    /// would let callers shadow or impersonate the system queues.
    pub fn create_system_queue(&self, name: &str) -> QueueResult<Arc<Queue<T>>> {
        self.insert_queue(name)
    }

    fn insert_queue(&self, name: &str) -> QueueResult<Arc<Queue<T>>> {
        if name.is_empty() {
            return Err(QueueError::InvalidArgument {
                message: "queue name must not be empty".to_string(),
            });
        }

        let mut queues = write_or_recover(&self.queues, "queue pool");
        if queues.contains_key(name) {
            return Err(QueueError::QueueExists {
                name: name.to_string(),
            });
        }

        let queue = Arc::new(Queue::new(self.config.size)?);
        queues.insert(name.to_string(), Arc::clone(&queue));
        log::debug!("Registered queue '{}' ({})", name, queue.id());
        Ok(queue)
    }

    pub fn has_queue(&self, name: &str) -> bool {
        read_or_recover(&self.queues, "queue pool").contains_key(name)
    }

    /// Look up a queue by name
    pub fn get_queue(&self, name: &str) -> QueueResult<Arc<Queue<T>>> {
        read_or_recover(&self.queues, "queue pool")
            .get(name)
            .cloned()
            .ok_or_else(|| QueueError::QueueMissing {
                name: name.to_string(),
            })
    }

    /// Handles for every queue, ordered by name
    pub fn list_queues(&self, include_system: bool) -> Vec<Arc<Queue<T>>> {
        read_or_recover(&self.queues, "queue pool")
            .iter()
            .filter(|(name, _)| include_system || SystemQueue::from_name(name).is_none())
            .map(|(_, queue)| Arc::clone(queue))
            .collect()
    }

    /// Names of every queue, sorted
    pub fn queue_names(&self, include_system: bool) -> Vec<String> {
        read_or_recover(&self.queues, "queue pool")
            .keys()
            .filter(|name| include_system || SystemQueue::from_name(name).is_none())
            .cloned()
            .collect()
    }

    /// Statistics for every queue, keyed by name
    pub fn stats(&self, include_system: bool) -> BTreeMap<String, QueueStats> {
        let queues: Vec<(String, Arc<Queue<T>>)> = read_or_recover(&self.queues, "queue pool")
            .iter()
            .filter(|(name, _)| include_system || SystemQueue::from_name(name).is_none())
            .map(|(name, queue)| (name.clone(), Arc::clone(queue)))
            .collect();

        queues
            .into_iter()
            .map(|(name, queue)| (name, queue.stats()))
            .collect()
    }

    /// Number of queues, system queues included
    pub fn len(&self) -> usize {
        read_or_recover(&self.queues, "queue pool").len()
    }

    /// Pairs with [`len`](Self::len). Always `false` once constructed, since
    /// the system queues are never removed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pending_queues(&self) -> Vec<String> {
        read_or_recover(&self.queues, "queue pool")
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn join_attempts(&self) -> u64 {
        self.config
            .join_timeout_ms
            .div_ceil(self.config.join_poll_interval_ms)
    }

    fn report_join_timeout(&self) -> bool {
        let pending = self.pending_queues();
        if pending.is_empty() {
            return true;
        }
        log::warn!(
            "Queues not drained after {} ms: {}",
            self.config.join_timeout_ms,
            pending.join(", ")
        );
        false
    }

    /// Wait until every queue is empty, within the configured budget
    ///
    /// Polls every `join_poll_interval_ms` for at most `join_timeout_ms`.
    /// Returns `false` if some queue still held items when the budget ran out.
    pub fn join(&self) -> bool {
        for _ in 0..self.join_attempts() {
            if self.pending_queues().is_empty() {
                return true;
            }
            std::thread::sleep(self.config.join_poll_interval());
        }
        self.report_join_timeout()
    }

    /// Async variant of [`join`](Self::join) that sleeps on the tokio timer
    pub async fn join_async(&self) -> bool {
        for _ in 0..self.join_attempts() {
            if self.pending_queues().is_empty() {
                return true;
            }
            tokio::time::sleep(self.config.join_poll_interval()).await;
        }
        self.report_join_timeout()
    }
}

impl<T> std::fmt::Debug for QueuePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePool")
            .field("config", &self.config)
            .field("queues", &self.queue_names(true))
            .finish()
    }
}
