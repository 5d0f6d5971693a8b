//! Stellar vanity address finder.
//!
//! `xlm-vanity --find CAFE` brute-forces random keypairs on every core
//! until the deadline, an interrupt, or the heat death of the universe,
//! appending every matching (address, seed) pair to `CAFE.json`.

use clap::Parser;
use crossbeam_channel::bounded;

use xlm_vanity::config::Args;
use xlm_vanity::search;

fn main() -> anyhow::Result<()> {
    let config = Args::parse().resolve()?;
    xlm_vanity::set_up_logging()?;

    // the handler stays installed for the process lifetime; the receiver
    // feeds the coordinator's hard-stop arm
    let (interrupt_tx, interrupt_rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    })?;

    search::run(&config, interrupt_rx)
}
