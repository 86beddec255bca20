//! One-shot draining iterator over a queue

use crate::queue::bounded::Queue;
use std::iter::FusedIterator;

/// Iterator returned by [`Queue::dump`]
///
/// Pulls items with non-blocking reads and ends at the first empty read.
/// Drained items do not count towards `out_total`. Once finished the
/// iterator stays finished even if new items arrive; call `dump` again for
/// those.
pub struct Dump<'a, T> {
    queue: &'a Queue<T>,
    finished: bool,
}

impl<'a, T> Dump<'a, T> {
    pub(crate) fn new(queue: &'a Queue<T>) -> Self {
        Self {
            queue,
            finished: false,
        }
    }
}

impl<T> Iterator for Dump<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        let item = self.queue.take_uncounted();
        if item.is_none() {
            self.finished = true;
        }
        item
    }
}

impl<T> FusedIterator for Dump<'_, T> {}
