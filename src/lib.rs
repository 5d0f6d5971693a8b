//! Brute-force search of the Stellar keypair space for an address that
//! contains a wanted substring.
//!
//! The search itself is trivial (generate, test, repeat); everything
//! interesting lives in the coordination: the worker pool, the shared scan
//! counter, the three-way shutdown (deadline, interrupt, done) and the
//! deduplicating JSON snapshot of found pairs.

use std::io;

pub mod config;
pub mod keypair;
pub mod matcher;
pub mod report;
pub mod search;
pub mod store;
pub mod worker;

/// Timestamped console logging. Level is fixed at `Info` so search
/// feedback is visible without `RUST_LOG`.
pub fn set_up_logging() -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(io::stdout())
        .apply()?;
    Ok(())
}
