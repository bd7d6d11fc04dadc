//! Concurrent file hashing pipeline.
//!
//! Fans a batch of files out to a bounded pool of worker threads, each
//! pulling one file at a time from a shared queue, and fans the digests
//! back into a single collection. A failure on one file never aborts the
//! rest of the batch.

use crate::error::HashFailure;
use crate::hash;
use crate::progress::Progress;
use crate::walker::FileMeta;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, warn};

/// Outcome of hashing a batch. Every input file lands in exactly one of
/// the two collections; neither has a guaranteed order.
#[derive(Debug, Default)]
pub struct HashOutcome {
    /// Successful digests keyed by the file's path as handed in.
    pub hashes: HashMap<PathBuf, String>,
    /// Files that could not be hashed, tagged with the offending path.
    pub errors: Vec<HashFailure>,
}

/// Hash every file in `files` across `workers` threads.
///
/// Worker counts below 1 are coerced to 1. The call returns only after
/// every file has been attempted exactly once; failures are recorded and
/// the batch carries on. The optional progress sink is advanced once per
/// successfully hashed file.
pub fn hash_files(files: &[FileMeta], workers: usize, progress: Option<&Progress>) -> HashOutcome {
    let workers = workers.max(1);
    let mut outcome = HashOutcome::default();

    if files.is_empty() {
        return outcome;
    }

    // Shared work queue: a cursor over the batch. Each fetch hands one
    // file to exactly one worker.
    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for _ in 0..workers.min(files.len()) {
            let tx = tx.clone();
            let next = &next;
            s.spawn(move || loop {
                let i = next.fetch_add(1, Ordering::Relaxed);
                let Some(meta) = files.get(i) else {
                    break;
                };
                let result = hash::hash_file(&meta.path);
                if tx.send((meta.path.clone(), result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        // Collect in completion order while the workers run.
        for (path, result) in rx {
            match result {
                Ok(digest) => {
                    if let Some(bar) = progress {
                        bar.file_done(&path);
                    }
                    outcome.hashes.insert(path, digest);
                }
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "failed to hash file");
                    outcome.errors.push(HashFailure { path, source });
                }
            }
        }
    });

    debug!(
        hashed = outcome.hashes.len(),
        failed = outcome.errors.len(),
        "hashing batch complete"
    );
    outcome
}
