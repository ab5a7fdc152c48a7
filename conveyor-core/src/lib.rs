//! Conveyor Core - Bounded buffer producer/consumer coordination
//!
//! This library provides a fixed-capacity circular buffer shared between
//! an arbitrary number of producer and consumer threads, synchronized by
//! two counting semaphores (empty slots, full slots) and a mutex guarding
//! the buffer state.

/// Counting semaphore primitive
pub mod sync;

/// Bounded circular buffer and the shared synchronization protocol
pub mod buffer;

/// Worker threads, run configuration and the timed demo runner
pub mod runner;
