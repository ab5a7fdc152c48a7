//! Counting semaphore built on a mutex-guarded count and a condition variable.
//!
//! The standard library has no counting semaphore, so this module implements
//! the classic condvar-over-count construction: `acquire` blocks while the
//! count is zero and decrements it, `release` increments the count and wakes
//! one waiter.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A counting semaphore.
///
/// Waiters block on a condition variable rather than spinning. No fairness
/// is guaranteed between waiters: any blocked thread may be the one woken
/// when a permit is released.
pub struct Semaphore {
    /// Number of permits currently available.
    permits: Mutex<usize>,

    /// Signalled whenever a permit is released.
    available: Condvar,
}

impl Semaphore {
    /// Creates a semaphore with the given number of initial permits.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Acquires one permit, blocking until one is available.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock().unwrap();
        // Loop guards against spurious wakeups.
        while *permits == 0 {
            permits = self.available.wait(permits).unwrap();
        }
        *permits -= 1;
    }

    /// Acquires one permit without blocking.
    ///
    /// Returns `true` if a permit was taken, `false` if none were available.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock().unwrap();
        if *permits > 0 {
            *permits -= 1;
            true
        } else {
            false
        }
    }

    /// Acquires one permit, blocking for at most `timeout`.
    ///
    /// Returns `true` if a permit was taken, `false` if the wait timed out.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut permits = self.permits.lock().unwrap();

        while *permits == 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, result) = self.available.wait_timeout(permits, deadline - now).unwrap();
            permits = guard;
            if result.timed_out() && *permits == 0 {
                return false;
            }
        }

        *permits -= 1;
        true
    }

    /// Releases one permit, waking one waiter if any are blocked.
    pub fn release(&self) {
        let mut permits = self.permits.lock().unwrap();
        *permits += 1;
        self.available.notify_one();
    }

    /// Returns the number of permits currently available.
    ///
    /// The value is a snapshot and may be stale by the time it is read
    /// by the caller; it is intended for reporting and tests.
    pub fn available(&self) -> usize {
        *self.permits.lock().unwrap()
    }
}
