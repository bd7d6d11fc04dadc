//! End-to-end tests across the walk, hash, build, persist, and compare
//! stages, driving real files on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use treesum::compare;
use treesum::pipeline;
use treesum::tree::{builder, codec, FileMap, FileRecord, MerkleTree};
use treesum::walker;

/// Walk, hash, and build a tree for `root`, asserting no hash failures.
fn scan(root: &Path, skip: &[String]) -> MerkleTree {
    let walk = walker::walk(root, skip).unwrap();
    let outcome = pipeline::hash_files(&walk.files, 4, None);
    assert!(outcome.errors.is_empty(), "unexpected hash failures");

    let files = index(&walk.files, &outcome.hashes);
    builder::build(files, root).unwrap()
}

fn index(
    files: &[walker::FileMeta],
    hashes: &HashMap<PathBuf, String>,
) -> FileMap {
    files
        .iter()
        .filter_map(|meta| {
            hashes.get(&meta.path).map(|hash| {
                (
                    meta.path.to_string_lossy().into_owned(),
                    FileRecord {
                        hash: hash.clone(),
                        size: meta.size,
                        mtime: meta.mtime,
                    },
                )
            })
        })
        .collect()
}

#[test]
fn scan_is_deterministic_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("b.txt"), "beta").unwrap();

    let first = scan(root, &[]);
    let second = scan(root, &[]);

    assert_eq!(first.root_hash(), second.root_hash());
    assert_eq!(first.files, second.files);
}

#[test]
fn unchanged_directory_compares_clean() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("one.txt"), "1").unwrap();
    fs::write(root.join("two.txt"), "2").unwrap();

    let saved = TempDir::new().unwrap();
    let tree_file = saved.path().join("tree.json");

    let old = scan(root, &[]);
    codec::save(&old, &tree_file).unwrap();

    let reloaded = codec::load(&tree_file).unwrap();
    let new = scan(root, &[]);

    let result = compare::compare(&reloaded, &new);
    assert!(!result.has_changes());
    assert_eq!(compare::format_report(&result), "No changes detected.");
}

#[test]
fn content_change_is_detected_through_persistence() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("stable.txt"), "same").unwrap();
    fs::write(root.join("volatile.txt"), "before").unwrap();

    let saved = TempDir::new().unwrap();
    let tree_file = saved.path().join("tree.json");
    codec::save(&scan(root, &[]), &tree_file).unwrap();

    fs::write(root.join("volatile.txt"), "after!").unwrap();

    let old = codec::load(&tree_file).unwrap();
    let new = scan(root, &[]);
    let result = compare::compare(&old, &new);

    assert_eq!(result.modified.len(), 1);
    assert!(result.modified[0].path.ends_with("volatile.txt"));
    assert!(result.added.is_empty());
    assert!(result.deleted.is_empty());
    assert_ne!(old.root_hash(), new.root_hash());
}

#[test]
fn additions_and_deletions_are_detected() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("keep.txt"), "k").unwrap();
    fs::write(root.join("doomed.txt"), "d").unwrap();

    let old = scan(root, &[]);

    fs::remove_file(root.join("doomed.txt")).unwrap();
    fs::write(root.join("fresh.txt"), "f").unwrap();

    let new = scan(root, &[]);
    let result = compare::compare(&old, &new);

    assert_eq!(result.added.len(), 1);
    assert!(result.added[0].path.ends_with("fresh.txt"));
    assert_eq!(result.deleted.len(), 1);
    assert!(result.deleted[0].path.ends_with("doomed.txt"));
    assert!(result.modified.is_empty());

    let report = compare::format_report(&result);
    assert!(report.contains("Summary: 1 added, 0 modified, 1 deleted"));
}

#[test]
fn touched_mtime_without_content_change_is_clean() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let path = root.join("steady.txt");
    fs::write(&path, "constant").unwrap();

    let old = scan(root, &[]);

    // Rewrite the same bytes; mtime moves, content does not.
    fs::write(&path, "constant").unwrap();

    let new = scan(root, &[]);
    let result = compare::compare(&old, &new);

    assert!(!result.has_changes());
    assert_eq!(old.root_hash(), new.root_hash());
}

#[test]
fn skip_patterns_keep_excluded_files_out_of_the_tree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("code.rs"), "fn main() {}").unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".git").join("HEAD"), "ref").unwrap();
    fs::write(root.join("noise.log"), "xxx").unwrap();

    let skip = vec![".git/".to_string(), "*.log".to_string()];
    let tree = scan(root, &skip);

    assert_eq!(tree.files.len(), 1);
    let only = tree.files.keys().next().unwrap();
    assert!(only.ends_with("code.rs"));

    // The excluded files do not influence the fingerprint.
    fs::write(root.join("noise.log"), "yyy").unwrap();
    let again = scan(root, &skip);
    assert_eq!(tree.root_hash(), again.root_hash());
}

#[test]
fn empty_directory_builds_and_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let tree = scan(temp_dir.path(), &[]);

    let saved = TempDir::new().unwrap();
    let tree_file = saved.path().join("empty.json");
    codec::save(&tree, &tree_file).unwrap();
    let loaded = codec::load(&tree_file).unwrap();

    assert_eq!(loaded.root_hash(), tree.root_hash());
    assert!(loaded.files.is_empty());

    let other = scan(temp_dir.path(), &[]);
    assert_eq!(tree.root_hash(), other.root_hash());
}
