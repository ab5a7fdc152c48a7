//! The timed producer/consumer runner.
//!
//! This module wires the pieces together: it builds the shared buffer,
//! spawns the configured producer and consumer threads, lets them run
//! for the configured duration, then raises the stop signal and joins
//! every worker before reporting.

mod config;
mod worker;

pub use config::RunConfig;
pub use worker::{consumer_loop, producer_loop, RunCounters, WorkerThread};

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::buffer::SharedBuffer;

/// Totals observed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Items successfully inserted across all producers.
    pub produced: usize,

    /// Items successfully removed across all consumers.
    pub consumed: usize,
}

/// Runs the producer/consumer demo to completion.
///
/// Shutdown is cooperative: after `run_for` elapses the stop flag is
/// raised and every worker is joined, so the returned report reflects a
/// quiescent buffer. Items still in the buffer at stop are abandoned,
/// not drained.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let buffer = Arc::new(SharedBuffer::new(config.capacity));
    let stop = Arc::new(AtomicBool::new(false));
    let counters = Arc::new(RunCounters::default());

    tracing::info!(
        producers = config.producers,
        consumers = config.consumers,
        capacity = config.capacity,
        run_for = ?config.run_for,
        "starting producer/consumer run"
    );

    let mut workers = Vec::with_capacity(config.producers + config.consumers);

    for id in 0..config.producers {
        let buffer = buffer.clone();
        let stop = stop.clone();
        let counters = counters.clone();
        let tick = config.tick;
        workers.push(WorkerThread::spawn(&format!("producer-{id}"), move || {
            producer_loop(id, buffer, stop, counters, tick);
        })?);
    }

    for id in 0..config.consumers {
        let buffer = buffer.clone();
        let stop = stop.clone();
        let counters = counters.clone();
        let tick = config.tick;
        workers.push(WorkerThread::spawn(&format!("consumer-{id}"), move || {
            consumer_loop(id, buffer, stop, counters, tick);
        })?);
    }

    // Let the workers run for the configured wall-clock duration.
    thread::sleep(config.run_for);

    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.join()?;
    }

    let report = RunReport {
        produced: counters.produced.load(Ordering::Relaxed),
        consumed: counters.consumed.load(Ordering::Relaxed),
    };

    tracing::info!(
        produced = report.produced,
        consumed = report.consumed,
        remaining = buffer.len(),
        "producer/consumer run complete"
    );

    Ok(report)
}
