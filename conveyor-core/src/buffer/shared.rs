//! The shared buffer and its synchronization protocol.
//!
//! Two counting semaphores gate access independently of the exclusion lock:
//! `empty` starts at the capacity and is acquired before every insert,
//! `full` starts at zero and is acquired before every remove. Acquiring the
//! permit strictly before the lock is the design rule: by the time a thread
//! holds the lock, the buffer is already known to have room (insert) or
//! content (remove), so the raw fail paths are unreachable unless the
//! protocol itself is broken.

use crate::buffer::bounded::{BoundedBuffer, BufferError, Item};
use crate::sync::Semaphore;

use std::sync::Mutex;
use std::time::Duration;

/// A bounded buffer shared between producer and consumer threads.
///
/// All mutation of the buffer happens under the internal mutex; the two
/// semaphores are the only other shared state and are internally
/// synchronized. Clone an `Arc<SharedBuffer>` into every worker.
pub struct SharedBuffer {
    /// The buffer state, guarded by the exclusion lock.
    inner: Mutex<BoundedBuffer>,

    /// Permits for empty slots; producers acquire, consumers release.
    empty: Semaphore,

    /// Permits for full slots; consumers acquire, producers release.
    full: Semaphore,
}

impl SharedBuffer {
    /// Creates a shared buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BoundedBuffer::new(capacity)),
            empty: Semaphore::new(capacity),
            full: Semaphore::new(0),
        }
    }

    /// Inserts an item, blocking while the buffer is full.
    ///
    /// Runs the full producer protocol: acquire one empty permit, insert
    /// under the lock, release one full permit. An `Err` here means the
    /// permit accounting was violated; the empty permit is handed back so
    /// the counters stay consistent.
    pub fn produce(&self, item: Item) -> Result<(), BufferError> {
        self.empty.acquire();
        self.insert_locked(item)
    }

    /// Removes an item, blocking while the buffer is empty.
    ///
    /// Runs the full consumer protocol: acquire one full permit, remove
    /// under the lock, release one empty permit.
    pub fn consume(&self) -> Result<Item, BufferError> {
        self.full.acquire();
        self.remove_locked()
    }

    /// Like [`produce`](Self::produce), but waits at most `wait` for an
    /// empty slot. Returns `None` if no slot became available in time.
    ///
    /// Workers use the bounded wait to re-check their stop signal instead
    /// of blocking indefinitely on a permit.
    pub fn produce_timeout(&self, item: Item, wait: Duration) -> Option<Result<(), BufferError>> {
        if !self.empty.acquire_timeout(wait) {
            return None;
        }
        Some(self.insert_locked(item))
    }

    /// Like [`consume`](Self::consume), but waits at most `wait` for a
    /// full slot. Returns `None` if no item became available in time.
    pub fn consume_timeout(&self, wait: Duration) -> Option<Result<Item, BufferError>> {
        if !self.full.acquire_timeout(wait) {
            return None;
        }
        Some(self.remove_locked())
    }

    /// Returns the number of items currently in the buffer.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns `true` if the buffer currently holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.inner.lock().unwrap().capacity()
    }

    /// The critical section of the producer protocol. The caller must
    /// already hold one empty permit.
    fn insert_locked(&self, item: Item) -> Result<(), BufferError> {
        let result = self.inner.lock().unwrap().insert(item);
        match result {
            Ok(()) => {
                self.full.release();
                Ok(())
            }
            Err(err) => {
                // Protocol violation: give the unused permit back.
                self.empty.release();
                Err(err)
            }
        }
    }

    /// The critical section of the consumer protocol. The caller must
    /// already hold one full permit.
    fn remove_locked(&self) -> Result<Item, BufferError> {
        let result = self.inner.lock().unwrap().remove();
        match result {
            Ok(item) => {
                self.empty.release();
                Ok(item)
            }
            Err(err) => {
                self.full.release();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_utils::thread;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_single_item_round_trip() {
        // Capacity 1: one producer inserts 7, one consumer removes it.
        let buffer = SharedBuffer::new(1);

        buffer.produce(7).unwrap();
        assert_eq!(buffer.len(), 1);

        assert_eq!(buffer.consume().unwrap(), 7);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_produce_blocks_when_full() {
        let buffer = SharedBuffer::new(3);

        for item in [1, 2, 3] {
            buffer.produce(item).unwrap();
        }

        // The protocol path does not fail when full, it waits for a slot.
        assert_eq!(
            buffer.produce_timeout(4, Duration::from_millis(50)),
            None
        );
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_consume_blocks_when_never_produced() {
        // No producers: full permits stay at zero and the consumer waits
        // forever. Bounded here so the test itself terminates.
        let buffer = SharedBuffer::new(5);
        assert_eq!(buffer.consume_timeout(Duration::from_millis(50)), None);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_blocked_producer_unblocked_by_consume() {
        let buffer = Arc::new(SharedBuffer::new(1));
        buffer.produce(10).unwrap();

        thread::scope(|s| {
            let producer = s.spawn(|_| {
                // Blocks until the consumer below frees a slot.
                buffer.produce(20).unwrap();
            });

            std::thread::sleep(Duration::from_millis(20));
            assert_eq!(buffer.consume().unwrap(), 10);

            producer.join().unwrap();
        })
        .unwrap();

        assert_eq!(buffer.consume().unwrap(), 20);
    }

    #[test]
    fn test_blocked_consumer_unblocked_by_produce() {
        let buffer = Arc::new(SharedBuffer::new(1));

        thread::scope(|s| {
            let consumer = s.spawn(|_| buffer.consume().unwrap());

            std::thread::sleep(Duration::from_millis(20));
            buffer.produce(33).unwrap();

            assert_eq!(consumer.join().unwrap(), 33);
        })
        .unwrap();
    }

    #[test]
    fn test_len_never_exceeds_capacity_under_contention() {
        const CAPACITY: usize = 4;
        const PRODUCERS: usize = 3;
        const CONSUMERS: usize = 3;
        const ITEMS_PER_PRODUCER: i32 = 200;

        let buffer = SharedBuffer::new(CAPACITY);
        let max_seen = AtomicUsize::new(0);

        thread::scope(|s| {
            for p in 0..PRODUCERS {
                let buffer = &buffer;
                let max_seen = &max_seen;
                s.spawn(move |_| {
                    for i in 0..ITEMS_PER_PRODUCER {
                        buffer.produce(p as i32 * 1000 + i).unwrap();
                        // len() can only be observed between transitions,
                        // which is exactly where the invariant must hold.
                        max_seen.fetch_max(buffer.len(), Ordering::Relaxed);
                    }
                });
            }
            for _ in 0..CONSUMERS {
                let buffer = &buffer;
                s.spawn(move |_| {
                    for _ in 0..ITEMS_PER_PRODUCER {
                        buffer.consume().unwrap();
                    }
                });
            }
        })
        .unwrap();

        assert!(max_seen.load(Ordering::Relaxed) <= CAPACITY);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_critical_section_is_exclusive() {
        // Rebuilds the protocol from its parts with an occupancy gauge in
        // the critical section; the gauge must never see a second thread.
        use crate::buffer::BoundedBuffer;
        use crate::sync::Semaphore;
        use std::sync::Mutex;

        const THREADS: usize = 4;
        const ROUNDS: i32 = 100;

        let inner = Mutex::new(BoundedBuffer::new(2));
        let empty = Semaphore::new(2);
        let full = Semaphore::new(0);
        let occupancy = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let inner = &inner;
                let empty = &empty;
                let full = &full;
                let occupancy = &occupancy;
                s.spawn(move |_| {
                    for i in 0..ROUNDS {
                        empty.acquire();
                        {
                            let mut guard = inner.lock().unwrap();
                            assert_eq!(occupancy.fetch_add(1, Ordering::SeqCst), 0);
                            guard.insert(i).unwrap();
                            occupancy.fetch_sub(1, Ordering::SeqCst);
                        }
                        full.release();

                        full.acquire();
                        {
                            let mut guard = inner.lock().unwrap();
                            assert_eq!(occupancy.fetch_add(1, Ordering::SeqCst), 0);
                            guard.remove().unwrap();
                            occupancy.fetch_sub(1, Ordering::SeqCst);
                        }
                        empty.release();
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(inner.lock().unwrap().len(), 0);
    }

    #[test]
    fn test_all_items_delivered_exactly_once() {
        const PRODUCERS: i32 = 2;
        const ITEMS_PER_PRODUCER: i32 = 100;

        let buffer = SharedBuffer::new(3);
        let sum = AtomicUsize::new(0);

        thread::scope(|s| {
            for p in 0..PRODUCERS {
                let buffer = &buffer;
                s.spawn(move |_| {
                    for i in 0..ITEMS_PER_PRODUCER {
                        buffer.produce(p * ITEMS_PER_PRODUCER + i).unwrap();
                    }
                });
            }

            let buffer = &buffer;
            let sum = &sum;
            s.spawn(move |_| {
                for _ in 0..PRODUCERS * ITEMS_PER_PRODUCER {
                    let item = buffer.consume().unwrap();
                    sum.fetch_add(item as usize, Ordering::Relaxed);
                }
            });
        })
        .unwrap();

        // Sum of 0..200 delivered exactly once.
        let expected: usize = (0..(PRODUCERS * ITEMS_PER_PRODUCER) as usize).sum();
        assert_eq!(sum.load(Ordering::Relaxed), expected);
        assert!(buffer.is_empty());
    }
}
