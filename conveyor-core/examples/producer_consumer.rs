//! The producer/consumer demo driver.
//!
//! Runs a timed producer/consumer session against the shared bounded
//! buffer:
//!
//!     cargo run --example producer_consumer -- <run-seconds> <producers> <consumers>
//!
//! Every insert and remove is logged as it happens; after the run
//! duration elapses the workers are stopped, joined and the totals are
//! printed.

use anyhow::Result;
use conveyor_core::runner::{self, RunConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = RunConfig::from_args(std::env::args().skip(1))?;
    let report = runner::run(&config)?;

    println!(
        "Producer & consumer demo complete: produced {}, consumed {}.",
        report.produced, report.consumed
    );

    Ok(())
}
