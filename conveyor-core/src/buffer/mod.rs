//! Bounded circular buffer shared between producers and consumers.
//!
//! This module implements a fixed-capacity FIFO buffer of integer items,
//! guarded by a mutex for the buffer state and two counting semaphores
//! that account for empty and full slots.

mod bounded;
mod shared;

pub use bounded::{BoundedBuffer, BufferError, Item};
pub use shared::SharedBuffer;

use std::sync::Arc;

/// Default capacity of the bounded buffer.
pub const DEFAULT_CAPACITY: usize = 5;

/// Creates a shared buffer with the default capacity, ready to be handed
/// to producer and consumer threads.
pub fn create_shared_buffer() -> Arc<SharedBuffer> {
    Arc::new(SharedBuffer::new(DEFAULT_CAPACITY))
}
