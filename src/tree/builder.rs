//! Deterministic Merkle construction over hashed files.

use crate::error::TreeError;
use crate::hash;
use crate::tree::{FileMap, MerkleTree, TreeNode};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Marker hashed to produce the root digest of an empty tree. Repeated
/// empty builds always yield the same root.
const EMPTY_TREE_MARKER: &[u8] = b"empty-tree";

/// Build a Merkle tree from hashed files.
///
/// Leaves are laid out in byte-wise lexicographic path order; that sort is
/// the sole source of tree shape, so discovery order never affects the
/// root hash. Levels collapse bottom-up by pairing adjacent nodes; an odd
/// node at the end of a level is paired with itself rather than promoted,
/// so every internal node has exactly two children. A single file's tree
/// is that leaf as its own root.
pub fn build(files: FileMap, root_path: &Path) -> Result<MerkleTree, TreeError> {
    let start = Instant::now();
    let total_size: u64 = files.values().map(|f| f.size).sum();
    let file_count = files.len();

    // Leaf level in path order; FileMap iteration is already the byte-wise
    // lexicographic order the tree shape is defined over.
    let mut level: Vec<TreeNode> = files
        .iter()
        .map(|(path, record)| {
            TreeNode::leaf(
                record.hash.clone(),
                relative_to(path, root_path),
                record.size,
                record.mtime,
            )
        })
        .collect();

    while level.len() > 1 {
        level = collapse(level)?;
    }

    let root = match level.pop() {
        Some(node) => node,
        // No files at all: the sentinel-derived root.
        None => TreeNode::bare(hash::digest(EMPTY_TREE_MARKER)),
    };

    info!(
        root_hash = %root.hash,
        files = file_count,
        duration_ms = start.elapsed().as_millis(),
        "built merkle tree"
    );

    Ok(MerkleTree {
        root,
        root_path: root_path.to_path_buf(),
        total_size,
        files,
    })
}

/// Collapse one level into its parent level, pairing left to right.
fn collapse(level: Vec<TreeNode>) -> Result<Vec<TreeNode>, TreeError> {
    let mut next = Vec::with_capacity((level.len() + 1) / 2);
    let mut nodes = level.into_iter();

    while let Some(left) = nodes.next() {
        let parent = match nodes.next() {
            Some(right) => {
                let hash = hash::combine(&left.hash, &right.hash)?;
                TreeNode::parent(hash, left, right)
            }
            None => {
                // Odd tail: the node pairs with itself.
                let hash = hash::combine(&left.hash, &left.hash)?;
                TreeNode::parent(hash, left.clone(), left)
            }
        };
        next.push(parent);
    }

    Ok(next)
}

/// Path of a leaf relative to the scanned root. A path outside the root is
/// kept as-is; the root itself scanned as a file reduces to its base name.
fn relative_to(path: &str, root: &Path) -> String {
    let p = Path::new(path);
    match p.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string()),
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => path.to_string(),
    }
}
