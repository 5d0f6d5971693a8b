//! Found-pair storage: an in-memory, discovery-ordered set plus a JSON
//! snapshot on disk that merges across runs.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

/// A pair whose address satisfied the query. The seed is the secret: it is
/// shown on the console and written to the output file, nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Found {
    pub address: String,
    pub seed: String,
}

impl Found {
    /// Dedup identity. strkey is ASCII, so byte-wise case folding is exact.
    fn same_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

/// Results in discovery order, mirrored to `path` on every find.
///
/// The mutex guards the vector only; file I/O happens outside it and is
/// single-writer in practice (only the coordinator loop calls
/// [`Store::persist`]).
pub struct Store {
    path: PathBuf,
    results: Mutex<Vec<Found>>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append under the lock, unless an entry with the same address is
    /// already present.
    pub fn record(&self, found: Found) {
        let mut results = self.results.lock().unwrap();
        if !results.iter().any(|r| r.same_address(&found.address)) {
            results.push(found);
        }
    }

    /// Merge the on-disk snapshot into the in-memory set (skipping entries
    /// whose address is already present), then rewrite the file with the
    /// union. Returns the number of entries written.
    ///
    /// A missing file counts as an empty snapshot. A malformed or
    /// unreadable one is an error: corrupt state must surface, not be
    /// silently overwritten. Seeds are too valuable to lose, so every
    /// write failure is an error too; only a short write is downgraded to
    /// a warning, since the entries stay in memory and the next find
    /// rewrites the whole file.
    pub fn persist(&self) -> anyhow::Result<usize> {
        let existing = self.read_snapshot()?;

        let merged = {
            let mut results = self.results.lock().unwrap();
            for entry in existing {
                if !results.iter().any(|r| r.same_address(&entry.address)) {
                    results.push(entry);
                }
            }
            results.clone()
        };

        let encoded = serde_json::to_vec(&merged)?;
        let mut file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        let written = file
            .write(&encoded)
            .with_context(|| format!("writing {}", self.path.display()))?;
        if written != encoded.len() {
            warn!("{} bytes written != {} bytes encoded", written, encoded.len());
        }
        file.sync_all()
            .with_context(|| format!("syncing {}", self.path.display()))?;
        Ok(merged.len())
    }

    fn read_snapshot(&self) -> anyhow::Result<Vec<Found>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        serde_json::from_slice(&data)
            .with_context(|| format!("malformed results file {}", self.path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    fn found(address: &str) -> Found {
        Found {
            address: address.into(),
            seed: format!("S{address}"),
        }
    }

    fn decode(path: &Path) -> Vec<Found> {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn record_skips_duplicate_addresses() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("out.json"));
        store.record(found("GABC"));
        store.record(found("GABC"));
        store.record(found("gabc"));
        store.record(found("GDEF"));
        assert_eq!(store.persist().unwrap(), 2);
    }

    #[test]
    fn persist_writes_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let store = Store::new(&path);
        store.record(found("GABC"));
        assert_eq!(store.persist().unwrap(), 1);
        assert_eq!(decode(&path), vec![found("GABC")]);
    }

    #[test]
    fn persist_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let store = Store::new(&path);
        store.record(found("GABC"));
        store.persist().unwrap();
        let first = decode(&path);
        assert_eq!(store.persist().unwrap(), 1);
        assert_eq!(decode(&path), first);
    }

    #[test]
    fn persist_merges_prior_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(
            &path,
            serde_json::to_vec(&vec![found("GOLD"), found("GABC")]).unwrap(),
        )
        .unwrap();

        let store = Store::new(&path);
        store.record(found("GABC"));
        store.record(found("GNEW"));
        assert_eq!(store.persist().unwrap(), 3);

        let on_disk = decode(&path);
        assert_eq!(on_disk.len(), 3);
        // discovery order first, then the merged prior-run entry
        assert_eq!(on_disk[0], found("GABC"));
        assert_eq!(on_disk[1], found("GNEW"));
        assert_eq!(on_disk[2], found("GOLD"));
    }

    #[test]
    fn malformed_snapshot_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, b"{truncated").unwrap();

        let store = Store::new(&path);
        store.record(found("GABC"));
        assert!(store.persist().is_err());
    }
}
