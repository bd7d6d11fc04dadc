//! Tree comparison and change reporting.
//!
//! Comparison is a pure value diff over the two trees' flat file maps; the
//! nested structure is never walked and no hashes are re-derived.

use crate::tree::{FileRecord, MerkleTree};
use chrono::DateTime;

/// How a path changed between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// One changed path, carrying the records on whichever sides it exists.
#[derive(Debug, Clone)]
pub struct Change {
    pub kind: ChangeKind,
    pub path: String,
    pub old: Option<FileRecord>,
    pub new: Option<FileRecord>,
}

/// Changes between two trees, each list sorted by path ascending.
#[derive(Debug, Default)]
pub struct CompareResult {
    pub added: Vec<Change>,
    pub modified: Vec<Change>,
    pub deleted: Vec<Change>,
}

impl CompareResult {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.modified.is_empty() || !self.deleted.is_empty()
    }
}

/// Diff two trees by value over their flat file maps.
///
/// A path present only in `new` is added; present only in `old`, deleted.
/// A path present in both counts as modified only when its content hash
/// differs; size or mtime drift alone is not a change.
pub fn compare(old: &MerkleTree, new: &MerkleTree) -> CompareResult {
    let mut result = CompareResult::default();

    for (path, new_record) in &new.files {
        match old.files.get(path) {
            Some(old_record) => {
                if old_record.hash != new_record.hash {
                    result.modified.push(Change {
                        kind: ChangeKind::Modified,
                        path: path.clone(),
                        old: Some(old_record.clone()),
                        new: Some(new_record.clone()),
                    });
                }
            }
            None => result.added.push(Change {
                kind: ChangeKind::Added,
                path: path.clone(),
                old: None,
                new: Some(new_record.clone()),
            }),
        }
    }

    for (path, old_record) in &old.files {
        if !new.files.contains_key(path) {
            result.deleted.push(Change {
                kind: ChangeKind::Deleted,
                path: path.clone(),
                old: Some(old_record.clone()),
                new: None,
            });
        }
    }

    // The file maps iterate in path order, so all three lists come out
    // sorted without an extra pass.
    result
}

/// Render the canonical change report.
pub fn format_report(result: &CompareResult) -> String {
    if !result.has_changes() {
        return "No changes detected.".to_string();
    }

    let mut report = String::from("Changes detected:\n\n");

    if !result.added.is_empty() {
        report.push_str(&format!("ADDED ({} files):\n", result.added.len()));
        for change in &result.added {
            if let Some(ref new) = change.new {
                report.push_str(&format!(
                    "  + {} (hash: {}, size: {} bytes)\n",
                    change.path, new.hash, new.size
                ));
            }
        }
        report.push('\n');
    }

    if !result.modified.is_empty() {
        report.push_str(&format!("MODIFIED ({} files):\n", result.modified.len()));
        for change in &result.modified {
            report.push_str(&format!("  ~ {}\n", change.path));
            if let Some(ref old) = change.old {
                report.push_str(&format!(
                    "    Old: hash={}, size={} bytes, modified={}\n",
                    old.hash,
                    old.size,
                    format_date(old.mtime)
                ));
            }
            if let Some(ref new) = change.new {
                report.push_str(&format!(
                    "    New: hash={}, size={} bytes, modified={}\n",
                    new.hash,
                    new.size,
                    format_date(new.mtime)
                ));
            }
        }
        report.push('\n');
    }

    if !result.deleted.is_empty() {
        report.push_str(&format!("DELETED ({} files):\n", result.deleted.len()));
        for change in &result.deleted {
            if let Some(ref old) = change.old {
                report.push_str(&format!(
                    "  - {} (hash: {}, size: {} bytes)\n",
                    change.path, old.hash, old.size
                ));
            }
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "Summary: {} added, {} modified, {} deleted\n",
        result.added.len(),
        result.modified.len(),
        result.deleted.len()
    ));

    report
}

fn format_date(mtime: i64) -> String {
    DateTime::from_timestamp(mtime, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| mtime.to_string())
}
