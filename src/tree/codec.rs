//! Persistence for built trees.
//!
//! A saved tree is a JSON document carrying a generator tag, a creation
//! timestamp, the scanned root path, a human-readable total size, and the
//! full nested node structure. Loading reconstructs the in-memory tree and
//! re-derives the flat file map by walking the leaves, so the flat view is
//! never persisted separately and cannot drift from the tree.

use crate::error::TreeError;
use crate::tree::{FileMap, FileRecord, MerkleTree, TreeNode};
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tag written into every saved tree file.
const GENERATOR: &str = concat!("treesum/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize)]
struct TreeDocument {
    generator: String,
    created: DateTime<FixedOffset>,
    root: PathBuf,
    size: String,
    tree: TreeNode,
}

/// Serialize `tree` to `destination` as pretty-printed JSON.
pub fn save(tree: &MerkleTree, destination: &Path) -> Result<(), TreeError> {
    let document = TreeDocument {
        generator: GENERATOR.to_string(),
        created: Local::now().fixed_offset(),
        root: tree.root_path.clone(),
        size: format_size(tree.total_size),
        tree: tree.root.clone(),
    };

    let data = serde_json::to_string_pretty(&document)?;
    fs::write(destination, data)?;

    info!(path = %destination.display(), root_hash = %tree.root.hash, "saved tree");
    Ok(())
}

/// Load a previously saved tree from `source`.
///
/// The flat file map is rebuilt by collecting every leaf, converting its
/// stored relative path back to an absolute one under the stored root, and
/// the total size is re-summed from the leaves actually present.
pub fn load(source: &Path) -> Result<MerkleTree, TreeError> {
    let data = fs::read_to_string(source)?;
    let document: TreeDocument = serde_json::from_str(&data)?;

    let mut files = FileMap::new();
    let mut total_size = 0u64;
    collect_leaves(&document.tree, &document.root, &mut files, &mut total_size);

    debug!(
        path = %source.display(),
        root_hash = %document.tree.hash,
        files = files.len(),
        "loaded tree"
    );

    Ok(MerkleTree {
        root: document.tree,
        root_path: document.root,
        total_size,
        files,
    })
}

/// Recursively collect leaves (nodes carrying a path) into the flat map.
///
/// A leaf duplicated by the odd-node pairing rule appears twice in the
/// nested structure; it is counted once here.
fn collect_leaves(node: &TreeNode, root: &Path, files: &mut FileMap, total_size: &mut u64) {
    if let Some(ref rel) = node.path {
        let size = node.size.unwrap_or(0);
        let absolute = root.join(rel).to_string_lossy().into_owned();
        let record = FileRecord {
            hash: node.hash.clone(),
            size,
            mtime: node.mtime.unwrap_or(0),
        };
        if files.insert(absolute, record).is_none() {
            *total_size += size;
        }
    }
    if let Some(ref left) = node.left {
        collect_leaves(left, root, files, total_size);
    }
    if let Some(ref right) = node.right {
        collect_leaves(right, root, files, total_size);
    }
}

/// Render a byte count for humans: two decimals at KB and above, raw
/// bytes below.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
