//! Bounded FIFO queue with fall-through mode and traffic statistics
//!
//! A [`Queue`] buffers opaque items between one pipeline stage and the next.
//! It starts in [`PutMode::FallThrough`]: until the orchestrator switches it to
//! [`PutMode::Enqueue`], every `put` discards its item and counts it as
//! dropped, so an unconnected queue never builds a backlog or blocks its
//! producer.
//!
//! The buffer, mode and counters share one mutex. Producers blocked on a full
//! buffer wait on `not_full`; consumers blocked on an empty buffer wait on
//! `not_empty`.

use crate::core::sync::{lock_or_recover, wait_or_recover};
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::queue::dump::Dump;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::rate::QueueRates;
use crate::queue::types::{PutMode, QueueStats};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use uuid::Uuid;

/// Buffer, mode and counters, always updated together
struct QueueState<T> {
    buffer: VecDeque<T>,
    mode: PutMode,
    in_total: u64,
    out_total: u64,
    dropped_total: u64,
}

/// Outcome of a put attempt, decided under the lock
enum Admission<T> {
    Accepted,
    Dropped(T),
    Full(T),
}

/// Bounded, instrumented FIFO queue
///
/// # Example
///
/// ```rust
/// use flowqueue::queue::{Queue, QueueError};
///
/// let queue = Queue::new(2).unwrap();
/// queue.put("ignored");
/// assert_eq!(queue.size(), 0);
///
/// queue.disable_fall_through();
/// queue.put("a");
/// queue.put("b");
/// assert_eq!(queue.try_put("c"), Err(QueueError::QueueFull { max_size: 2 }));
/// assert_eq!(queue.get(), "a");
/// ```
pub struct Queue<T> {
    id: Uuid,
    max_size: usize,
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    rates: Mutex<QueueRates>,
    clock: Arc<dyn TimeProvider>,
}

impl<T> Queue<T> {
    /// Create an empty queue in fall-through mode
    pub fn new(max_size: usize) -> QueueResult<Self> {
        Self::with_time_provider(max_size, Arc::new(SystemTimeProvider))
    }

    /// Create a queue that samples rates from a custom clock
    pub fn with_time_provider(
        max_size: usize,
        clock: Arc<dyn TimeProvider>,
    ) -> QueueResult<Self> {
        if max_size == 0 {
            return Err(QueueError::InvalidArgument {
                message: "max_size must be a positive integer".to_string(),
            });
        }

        let queue = Self {
            id: Uuid::new_v4(),
            max_size,
            state: Mutex::new(QueueState {
                buffer: VecDeque::new(),
                mode: PutMode::FallThrough,
                in_total: 0,
                out_total: 0,
                dropped_total: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            rates: Mutex::new(QueueRates::default()),
            clock,
        };
        log::debug!("Created queue {} (max size {})", queue.id, max_size);
        Ok(queue)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState<T>> {
        lock_or_recover(&self.state, "queue state")
    }

    /// Current put mode
    pub fn mode(&self) -> PutMode {
        self.lock_state().mode
    }

    pub fn is_fall_through(&self) -> bool {
        self.mode() == PutMode::FallThrough
    }

    /// Start buffering items. Idempotent.
    pub fn disable_fall_through(&self) {
        self.set_mode(PutMode::Enqueue);
    }

    /// Go back to discarding items. Idempotent; buffered items stay put.
    pub fn enable_fall_through(&self) {
        self.set_mode(PutMode::FallThrough);
    }

    fn set_mode(&self, mode: PutMode) {
        let previous = {
            let mut state = self.lock_state();
            std::mem::replace(&mut state.mode, mode)
        };
        if previous != mode {
            log::debug!("Queue {} switched to {} mode", self.id, mode);
            // Producers blocked on a full buffer re-check the mode
            self.not_full.notify_all();
        }
    }

    fn admit(&self, state: &mut QueueState<T>, item: T) -> Admission<T> {
        match state.mode {
            PutMode::FallThrough => {
                state.dropped_total += 1;
                Admission::Dropped(item)
            }
            PutMode::Enqueue if state.buffer.len() < self.max_size => {
                state.buffer.push_back(item);
                state.in_total += 1;
                Admission::Accepted
            }
            PutMode::Enqueue => Admission::Full(item),
        }
    }

    /// Put an item, blocking while the buffer is full
    ///
    /// In fall-through mode the item is discarded immediately. A producer
    /// blocked on a full buffer also discards its item if the queue is
    /// switched to fall-through mode while it waits.
    pub fn put(&self, mut item: T) {
        let mut state = self.lock_state();
        loop {
            match self.admit(&mut state, item) {
                Admission::Accepted => {
                    drop(state);
                    self.not_empty.notify_one();
                    return;
                }
                Admission::Dropped(discarded) => {
                    drop(state);
                    drop(discarded);
                    return;
                }
                Admission::Full(rejected) => {
                    item = rejected;
                    state = wait_or_recover(&self.not_full, state, "queue state");
                }
            }
        }
    }

    /// Put an item without blocking
    ///
    /// Fails with [`QueueError::QueueFull`] when the queue is in enqueue mode
    /// and at capacity; the queue is left untouched in that case.
    pub fn try_put(&self, item: T) -> QueueResult<()> {
        let mut state = self.lock_state();
        match self.admit(&mut state, item) {
            Admission::Accepted => {
                drop(state);
                self.not_empty.notify_one();
                Ok(())
            }
            Admission::Dropped(discarded) => {
                drop(state);
                drop(discarded);
                Ok(())
            }
            Admission::Full(_) => Err(QueueError::QueueFull {
                max_size: self.max_size,
            }),
        }
    }

    fn take_front(&self, state: &mut QueueState<T>) -> Option<T> {
        let item = state.buffer.pop_front()?;
        state.out_total += 1;
        Some(item)
    }

    /// Remove the oldest item, blocking while the buffer is empty
    pub fn get(&self) -> T {
        let mut state = self.lock_state();
        loop {
            if let Some(item) = self.take_front(&mut state) {
                drop(state);
                self.not_full.notify_one();
                return item;
            }
            state = wait_or_recover(&self.not_empty, state, "queue state");
        }
    }

    /// Remove the oldest item without blocking
    pub fn try_get(&self) -> QueueResult<T> {
        let item = {
            let mut state = self.lock_state();
            self.take_front(&mut state).ok_or(QueueError::QueueEmpty)?
        };
        self.not_full.notify_one();
        Ok(item)
    }

    /// Pop the oldest item without counting it as outbound traffic
    pub(crate) fn take_uncounted(&self) -> Option<T> {
        let item = self.lock_state().buffer.pop_front()?;
        self.not_full.notify_one();
        Some(item)
    }

    /// Append an item for redelivery without touching any counter
    ///
    /// Ignores mode and capacity: a rescued item is never dropped and the
    /// call never blocks, so the buffer may briefly exceed `max_size`.
    pub fn rescue(&self, item: T) {
        self.lock_state().buffer.push_back(item);
        self.not_empty.notify_one();
    }

    /// Drain the items buffered right now, oldest first
    ///
    /// Each call returns a fresh iterator; it stops at the first empty read.
    /// Drained items are not counted as outbound traffic.
    pub fn dump(&self) -> Dump<'_, T> {
        Dump::new(self)
    }

    /// Discard all buffered items. Counters are untouched.
    pub fn clean(&self) {
        let discarded = {
            let mut state = self.lock_state();
            std::mem::take(&mut state.buffer)
        };
        self.not_full.notify_all();
        if !discarded.is_empty() {
            log::debug!("Queue {} discarded {} buffered items", self.id, discarded.len());
        }
    }

    /// Number of items waiting to be retrieved
    pub fn size(&self) -> usize {
        self.lock_state().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Snapshot counters and per-second rates
    pub fn stats(&self) -> QueueStats {
        // Rates lock first so concurrent callers sample counters in order
        let mut rates = lock_or_recover(&self.rates, "queue rates");
        let (size, in_total, out_total, dropped_total) = {
            let state = self.lock_state();
            (
                state.buffer.len(),
                state.in_total,
                state.out_total,
                state.dropped_total,
            )
        };

        let now = self.clock.now();
        QueueStats {
            size,
            in_total,
            out_total,
            dropped_total,
            in_rate: rates.inbound.sample(now, in_total),
            out_rate: rates.outbound.sample(now, out_total),
            dropped_rate: rates.dropped.sample(now, dropped_total),
            sampled_at: self.clock.utc_now(),
        }
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Queue")
            .field("id", &self.id)
            .field("max_size", &self.max_size)
            .field("size", &state.buffer.len())
            .field("mode", &state.mode)
            .finish()
    }
}
