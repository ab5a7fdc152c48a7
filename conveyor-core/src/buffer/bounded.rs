//! Raw bounded buffer operations.
//!
//! This module defines the unsynchronized circular buffer. Callers are
//! expected to hold the exclusion lock in [`crate::buffer::SharedBuffer`]
//! before touching it; the permit protocol makes the capacity checks here
//! unreachable, so a `Full` or `Empty` result means the caller's
//! synchronization is broken.

use thiserror::Error;

/// The item type carried by the buffer.
pub type Item = i32;

/// Errors signalled by the raw buffer operations.
///
/// Under the permit discipline these indicate a synchronization bug in
/// the caller, not an expected runtime condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// An insert was attempted while the buffer held `capacity` items.
    #[error("buffer is full")]
    Full,

    /// A remove was attempted while the buffer held no items.
    #[error("buffer is empty")]
    Empty,
}

/// A fixed-capacity circular buffer of integer items.
///
/// Items are removed in the order they were inserted (FIFO). The head
/// index tracks the oldest item; inserts land at `(head + count) % capacity`.
pub struct BoundedBuffer {
    /// Backing storage, length equals the capacity.
    slots: Box<[Item]>,

    /// Index of the oldest item.
    head: usize,

    /// Number of occupied slots, always in `0..=capacity`.
    count: usize,
}

impl BoundedBuffer {
    /// Creates an empty buffer with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a zero-capacity buffer could never
    /// accept an item and would deadlock both protocols.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be at least 1");
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            head: 0,
            count: 0,
        }
    }

    /// Inserts `item` as the most recently inserted element.
    ///
    /// Fails with [`BufferError::Full`] if the buffer already holds
    /// `capacity` items. O(1): touches one slot and the count.
    pub fn insert(&mut self, item: Item) -> Result<(), BufferError> {
        if self.count == self.slots.len() {
            return Err(BufferError::Full);
        }
        let tail = (self.head + self.count) % self.slots.len();
        self.slots[tail] = item;
        self.count += 1;
        Ok(())
    }

    /// Removes and returns the oldest item.
    ///
    /// Fails with [`BufferError::Empty`] if the buffer holds no items.
    /// O(1): touches one slot and the count.
    pub fn remove(&mut self) -> Result<Item, BufferError> {
        if self.count == 0 {
            return Err(BufferError::Empty);
        }
        let item = self.slots[self.head];
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        Ok(item)
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no slots are occupied.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Returns the fixed capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
