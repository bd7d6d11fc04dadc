//! Directory traversal with exclusion patterns.
//!
//! Produces the file descriptors the hashing pipeline consumes. Per-entry
//! errors below the root are recorded and skipped, same policy as the
//! pipeline itself; only an unreadable root is fatal.

use glob::Pattern;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One file found during traversal.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub path: PathBuf,
    pub size: u64,
    /// Modification time, unix seconds.
    pub mtime: i64,
}

/// Traversal result: files found plus per-entry errors that were skipped.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<FileMeta>,
    pub errors: Vec<walkdir::Error>,
}

/// Exclusion patterns, split into directory patterns (written with a
/// trailing `/`) and file patterns.
struct SkipPatterns {
    dirs: Vec<Pattern>,
    files: Vec<(Pattern, bool)>,
}

impl SkipPatterns {
    fn parse(skip: &[String]) -> Self {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for raw in skip {
            if let Some(stripped) = raw.strip_suffix('/') {
                match Pattern::new(stripped) {
                    Ok(pattern) => dirs.push(pattern),
                    Err(err) => warn!(pattern = %raw, error = %err, "ignoring invalid skip pattern"),
                }
            } else {
                match Pattern::new(raw) {
                    Ok(pattern) => files.push((pattern, raw.contains('/'))),
                    Err(err) => warn!(pattern = %raw, error = %err, "ignoring invalid skip pattern"),
                }
            }
        }

        Self { dirs, files }
    }

    /// Directory patterns match against every component of the relative
    /// path, so an excluded directory name anywhere in the path excludes
    /// the entry.
    fn matches_component(&self, rel: &Path) -> bool {
        rel.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.dirs.iter().any(|pattern| pattern.matches(&name))
        })
    }

    /// File patterns match the base name; patterns containing `/` are also
    /// tried against the whole relative path.
    fn matches_file(&self, rel: &Path) -> bool {
        if self.matches_component(rel) {
            return true;
        }

        let base = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let full = rel.to_string_lossy();

        self.files
            .iter()
            .any(|(pattern, has_slash)| pattern.matches(&base) || (*has_slash && pattern.matches(&full)))
    }
}

/// Walk `root` and collect every file that survives the skip patterns.
///
/// Symlinks are not followed. Excluded directories are pruned, never
/// descended into. Only files are reported.
pub fn walk(root: &Path, skip: &[String]) -> Result<WalkOutcome, walkdir::Error> {
    let patterns = SkipPatterns::parse(skip);
    let mut outcome = WalkOutcome::default();

    let mut it = WalkDir::new(root).follow_links(false).into_iter();
    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // An unreadable root is fatal; anything below it is
                // recorded and skipped.
                if err.depth() == 0 {
                    return Err(err);
                }
                warn!(error = %err, "skipping unreadable entry");
                outcome.errors.push(err);
                continue;
            }
        };

        let rel = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());

        if entry.file_type().is_dir() {
            if entry.depth() > 0 && patterns.matches_component(rel) {
                it.skip_current_dir();
            }
            continue;
        }

        if !entry.file_type().is_file() {
            // Symlinks and special files are not fingerprinted.
            continue;
        }

        if patterns.matches_file(rel) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "skipping unreadable metadata");
                outcome.errors.push(err);
                continue;
            }
        };

        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        outcome.files.push(FileMeta {
            path: entry.path().to_path_buf(),
            size: metadata.len(),
            mtime,
        });
    }

    debug!(
        root = %root.display(),
        files = outcome.files.len(),
        skipped = outcome.errors.len(),
        "walk complete"
    );
    Ok(outcome)
}
