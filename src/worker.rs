//! The per-core generate-and-test loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::Sender;
use log::info;

use crate::keypair::Candidate;
use crate::matcher::Matcher;
use crate::report::group_digits;
use crate::store::Found;

/// Generate and test candidates until the stop flag is raised.
///
/// `generate` is the keypair collaborator; production passes
/// [`crate::keypair::random`], tests script a canned address sequence. A
/// worker that finds a pair keeps searching — the loop only ends on the
/// stop flag or a closed results channel.
///
/// In quiet mode the rejection path skips the shared counter entirely:
/// one less atomic write per candidate, in exchange for no progress
/// feedback.
pub fn run(
    mut generate: impl FnMut() -> Candidate,
    matcher: &Matcher,
    quiet: bool,
    stop: &AtomicBool,
    scanned: &AtomicU64,
    found_tx: &Sender<Found>,
) {
    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        let candidate = generate();
        if matcher.matches(&candidate.address) {
            if quiet {
                info!(
                    "Hey, you! A pair was found!\nXLM Wallet: {}\nSecret Seed: {}",
                    candidate.address, candidate.seed
                );
            } else {
                info!(
                    "Hey, you! A pair was found after {} addresses!\nXLM Wallet: {}\nSecret Seed: {}",
                    group_digits(scanned.load(Ordering::Relaxed)),
                    candidate.address,
                    candidate.seed
                );
            }
            let found = Found {
                address: candidate.address,
                seed: candidate.seed,
            };
            if found_tx.send(found).is_err() {
                // coordinator is gone
                return;
            }
        } else if !quiet {
            scanned.fetch_add(1, Ordering::Relaxed);
        }
    }
}
