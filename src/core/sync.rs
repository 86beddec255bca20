//! Synchronisation helpers for poison-tolerant locking
//!
//! Queue state is only ever mutated in small, panic-free critical sections, so
//! a poisoned lock still guards consistent data. These helpers recover the
//! guard instead of propagating the poison, and log that it happened.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock a mutex, recovering the guard if a previous holder panicked
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Recovered poisoned lock on {}", what);
        poisoned.into_inner()
    })
}

/// Block on a condition variable, recovering the guard on poison
pub fn wait_or_recover<'a, T>(
    condvar: &Condvar,
    guard: MutexGuard<'a, T>,
    what: &str,
) -> MutexGuard<'a, T> {
    condvar.wait(guard).unwrap_or_else(|poisoned| {
        log::warn!("Recovered poisoned lock on {} while waiting", what);
        poisoned.into_inner()
    })
}

/// Acquire a read guard, recovering on poison
pub fn read_or_recover<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned: PoisonError<_>| {
        log::warn!("Recovered poisoned read lock on {}", what);
        poisoned.into_inner()
    })
}

/// Acquire a write guard, recovering on poison
pub fn write_or_recover<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned: PoisonError<_>| {
        log::warn!("Recovered poisoned write lock on {}", what);
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_or_recover_success() {
        let mutex = Mutex::new(42);
        assert_eq!(*lock_or_recover(&mutex, "test"), 42);
    }

    #[test]
    fn test_lock_or_recover_with_poisoned_mutex() {
        let mutex = Arc::new(Mutex::new(42));
        let mutex_clone = Arc::clone(&mutex);

        // Poison the mutex by panicking while holding the lock
        let _ = thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("Intentional panic to poison mutex");
        })
        .join();

        assert!(mutex.is_poisoned());
        assert_eq!(*lock_or_recover(&mutex, "test"), 42);
    }

    #[test]
    fn test_rwlock_helpers_with_poisoned_lock() {
        let lock = Arc::new(RwLock::new(vec![1, 2]));
        let lock_clone = Arc::clone(&lock);

        let _ = thread::spawn(move || {
            let _guard = lock_clone.write().unwrap();
            panic!("Intentional panic to poison rwlock");
        })
        .join();

        write_or_recover(&lock, "test").push(3);
        assert_eq!(*read_or_recover(&lock, "test"), vec![1, 2, 3]);
    }
}
