//! Run lifecycle: the worker pool, the three shutdown triggers, the
//! central select loop, and match persistence.

use std::process;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, never, select, tick, Receiver};
use log::{info, warn};

use crate::config::RunConfig;
use crate::keypair::{self, Candidate};
use crate::matcher::Matcher;
use crate::report::Reporter;
use crate::store::{Found, Store};
use crate::worker;

/// Matches waiting for the coordinator. Finds are rare, so workers only
/// ever block on send under an extreme burst.
const FOUND_CHANNEL_CAPACITY: usize = 1024;

/// Search with the production keypair generator until one of the shutdown
/// triggers fires. `interrupt` delivers the external termination signal
/// (wired to Ctrl-C in `main`).
pub fn run(config: &RunConfig, interrupt: Receiver<()>) -> anyhow::Result<()> {
    run_with(config, interrupt, || keypair::random)
}

/// Generic over the keypair collaborator so tests can script the address
/// sequence. `make_generate` runs once per worker, on the coordinator
/// thread.
pub(crate) fn run_with<G, F>(
    config: &RunConfig,
    interrupt: Receiver<()>,
    make_generate: F,
) -> anyhow::Result<()>
where
    G: FnMut() -> Candidate + Send,
    F: Fn() -> G,
{
    // fail fast, before any worker starts
    let matcher = Matcher::new(&config.find)?;
    let store = Store::new(&config.output);
    let reporter = Reporter::new(config.quiet);
    let stop = AtomicBool::new(false);
    let scanned = AtomicU64::new(0);
    let (found_tx, found_rx) = bounded(FOUND_CHANNEL_CAPACITY);

    if !config.quiet {
        info!(
            "Searching for {:?} with {} workers, writing to {}",
            matcher.needle(),
            config.cores,
            config.output.display()
        );
    }

    thread::scope(|scope| {
        for _ in 0..config.cores {
            let found_tx = found_tx.clone();
            let generate = make_generate();
            let matcher = &matcher;
            let stop = &stop;
            let scanned = &scanned;
            scope.spawn(move || {
                worker::run(generate, matcher, config.quiet, stop, scanned, &found_tx)
            });
        }
        // the workers now hold the only senders; the channel disconnects
        // once they all return
        drop(found_tx);

        let result = event_loop(config, interrupt, found_rx, &stop, &scanned, &store, &reporter);
        // raise the flag on every exit path, otherwise the scope would
        // wait on the workers forever after a persistence error
        stop.store(true, Ordering::Relaxed);
        result
    })
}

/// The single place that decides how the run ends.
///
/// One select over the five event sources. The interrupt arm is a hard
/// stop: it exits the process without draining anything. Deadline and
/// channel-disconnect both funnel into the done marker, which is the one
/// graceful return path.
fn event_loop(
    config: &RunConfig,
    interrupt: Receiver<()>,
    found_rx: Receiver<Found>,
    stop: &AtomicBool,
    scanned: &AtomicU64,
    store: &Store,
    reporter: &Reporter,
) -> anyhow::Result<()> {
    let mut interrupt = interrupt;
    let mut found_rx = found_rx;
    let deadline = after(Duration::from_secs(config.stop_after));
    let report_tick = tick(Duration::from_secs(config.every));
    let (done_tx, done_rx) = bounded::<()>(1);

    loop {
        select! {
            recv(interrupt) -> message => {
                if message.is_ok() {
                    warn!("Watchdog received termination request. Exiting...");
                    process::exit(1);
                }
                // the signal source is gone; stop selecting on it
                interrupt = never();
            }
            recv(deadline) -> _ => {
                if !config.quiet {
                    info!("Timer reached limit.");
                }
                stop.store(true, Ordering::Relaxed);
                let _ = done_tx.try_send(());
            }
            recv(report_tick) -> _ => {
                reporter.tick(scanned.load(Ordering::Relaxed));
            }
            recv(done_rx) -> _ => {
                // final flush: take whatever reached the channel before
                // the trigger; anything a straggling worker sends after
                // this point is abandoned along with the channel
                for found in found_rx.try_iter() {
                    store.record(found);
                    let saved = store.persist()?;
                    if !config.quiet {
                        info!("Saved {} addresses to {}", saved, store.path().display());
                    }
                }
                if !config.quiet {
                    info!("Finished running!");
                }
                return Ok(());
            }
            recv(found_rx) -> message => match message {
                Ok(found) => {
                    // persistence sits on the match path on purpose: a
                    // found seed hits the disk before the next candidate
                    // is accepted
                    store.record(found);
                    let saved = store.persist()?;
                    if !config.quiet {
                        info!("Saved {} addresses to {}", saved, store.path().display());
                    }
                }
                Err(_) => {
                    // every worker has returned and the channel is drained
                    found_rx = never();
                    let _ = done_tx.try_send(());
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Instant;
    use tempfile::tempdir;

    fn test_config(find: &str, output: std::path::PathBuf, stop_after: u64) -> RunConfig {
        RunConfig {
            find: find.into(),
            cores: 1,
            output,
            stop_after,
            quiet: true,
            every: 30,
        }
    }

    #[test]
    fn invalid_query_fails_before_spawning() {
        let dir = tempdir().unwrap();
        let config = test_config("no spaces", dir.path().join("out.json"), 1);
        assert!(run(&config, never()).is_err());
    }

    #[test]
    fn deadline_ends_the_run_gracefully() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.json");
        // 60 characters can never fit in a 56-character address
        let config = test_config(&"Q".repeat(60), output.clone(), 1);

        let started = Instant::now();
        run(&config, never()).unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(4), "took {elapsed:?}");
        assert!(!output.exists(), "no match, no output file");
    }

    #[test]
    fn scripted_run_persists_exactly_the_matching_pair() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ab.json");
        let config = test_config("AB", output.clone(), 2);

        let make_generate = || {
            let mut script = ["GXXXX", "GABXX", "GYYYY"].into_iter();
            move || match script.next() {
                Some(address) => Candidate {
                    address: address.into(),
                    seed: format!("S{address}"),
                },
                None => Candidate {
                    address: "GZZZZ".into(),
                    seed: "SZZZZ".into(),
                },
            }
        };

        run_with(&config, never(), make_generate).unwrap();

        let on_disk: Vec<Found> =
            serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            vec![Found {
                address: "GABXX".into(),
                seed: "SGABXX".into(),
            }]
        );
    }
}
