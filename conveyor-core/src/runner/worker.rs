//! Worker threads for the producer/consumer run.
//!
//! This module handles spawning named worker threads and the two loop
//! bodies they run. Workers are cooperative: they watch a shared stop
//! flag between protocol steps and bound their permit waits so the flag
//! is observed promptly.

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::buffer::{Item, SharedBuffer};

/// A named worker thread owned by the runner.
pub struct WorkerThread {
    /// Thread name, used for logging and join diagnostics.
    name: String,

    /// The thread's join handle.
    handle: JoinHandle<()>,
}

impl WorkerThread {
    /// Spawns a named worker running `f`.
    pub fn spawn<F>(name: &str, f: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(f)
            .with_context(|| format!("failed to spawn worker thread {name:?}"))?;

        Ok(Self {
            name: name.to_string(),
            handle,
        })
    }

    /// Returns the worker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the worker to finish. A panicked worker surfaces as an
    /// error rather than propagating the panic into the runner.
    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| anyhow!("worker thread {:?} panicked", self.name))
    }
}

/// Shared counters reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunCounters {
    /// Total successful inserts across all producers.
    pub produced: AtomicUsize,

    /// Total successful removes across all consumers.
    pub consumed: AtomicUsize,
}

/// Producer loop: sleep a random 1-4 tick interval, generate a random
/// item, run the insert protocol. Failures are logged and the loop
/// continues; they indicate a synchronization bug, not a runtime state.
pub fn producer_loop(
    id: usize,
    buffer: Arc<SharedBuffer>,
    stop: Arc<AtomicBool>,
    counters: Arc<RunCounters>,
    tick: Duration,
) {
    let mut rng = rand::thread_rng();

    while !stop.load(Ordering::Relaxed) {
        thread::sleep(tick * rng.gen_range(1..=4));
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let item: Item = rng.gen_range(0..10_000);
        match buffer.produce_timeout(item, tick) {
            Some(Ok(())) => {
                counters.produced.fetch_add(1, Ordering::Relaxed);
                tracing::info!(producer = id, item, "inserted item");
            }
            Some(Err(err)) => {
                tracing::error!(producer = id, error = %err, "insert failed");
            }
            // No slot freed up within one tick; re-check stop and retry.
            None => continue,
        }
    }
}

/// Consumer loop, mirroring the producer: sleep, then run the remove
/// protocol with a bounded permit wait.
pub fn consumer_loop(
    id: usize,
    buffer: Arc<SharedBuffer>,
    stop: Arc<AtomicBool>,
    counters: Arc<RunCounters>,
    tick: Duration,
) {
    let mut rng = rand::thread_rng();

    while !stop.load(Ordering::Relaxed) {
        thread::sleep(tick * rng.gen_range(1..=4));
        if stop.load(Ordering::Relaxed) {
            break;
        }

        match buffer.consume_timeout(tick) {
            Some(Ok(item)) => {
                counters.consumed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(consumer = id, item, "removed item");
            }
            Some(Err(err)) => {
                tracing::error!(consumer = id, error = %err, "remove failed");
            }
            None => continue,
        }
    }
}
