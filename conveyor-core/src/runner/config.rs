//! Run configuration and positional-argument parsing.

use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::buffer::DEFAULT_CAPACITY;

/// Configuration for a timed producer/consumer run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Total wall-clock lifetime of the run before workers are stopped.
    pub run_for: Duration,

    /// Number of producer threads to start.
    pub producers: usize,

    /// Number of consumer threads to start.
    pub consumers: usize,

    /// Capacity of the shared buffer.
    pub capacity: usize,

    /// The "time unit" of the workers: each iteration sleeps a random
    /// 1-4 multiple of this, and permit waits are bounded by it so the
    /// stop signal is observed promptly. One second by default; tests
    /// shrink it to milliseconds.
    pub tick: Duration,
}

impl RunConfig {
    /// Builds a configuration from the three positional arguments
    /// `<run-seconds> <producers> <consumers>`.
    ///
    /// Any other argument count is rejected immediately, before any
    /// thread is spawned.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() != 3 {
            bail!(
                "expected 3 arguments: <run-seconds> <producers> <consumers>, got {}",
                args.len()
            );
        }

        let run_seconds: u64 = args[0]
            .parse()
            .with_context(|| format!("invalid run duration {:?}", args[0]))?;
        let producers: usize = args[1]
            .parse()
            .with_context(|| format!("invalid producer count {:?}", args[1]))?;
        let consumers: usize = args[2]
            .parse()
            .with_context(|| format!("invalid consumer count {:?}", args[2]))?;

        let config = Self {
            run_for: Duration::from_secs(run_seconds),
            producers,
            consumers,
            capacity: DEFAULT_CAPACITY,
            tick: Duration::from_secs(1),
        };
        config.warn_if_oversubscribed();
        Ok(config)
    }

    /// Logs a warning when the requested thread counts exceed the
    /// available parallelism. Not an error: the workers spend most of
    /// their time sleeping or blocked.
    fn warn_if_oversubscribed(&self) {
        let requested = self.producers + self.consumers;
        let available = num_cpus::get();
        if requested > available {
            tracing::warn!(
                requested,
                available,
                "more worker threads than logical cores"
            );
        }
    }
}
