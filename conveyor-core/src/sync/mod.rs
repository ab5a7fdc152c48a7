//! Synchronization primitives for the shared buffer.
//!
//! This module provides the counting semaphore used to account for
//! empty and full slots in the bounded buffer.

mod semaphore;

pub use semaphore::Semaphore;
