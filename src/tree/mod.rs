//! Merkle tree over a scanned directory.
//!
//! A tree is built once from a flat path-to-record map and is read-only
//! afterward. Leaves carry per-file metadata and reuse the file's content
//! digest as their hash; internal nodes hash the concatenation of their
//! children's digests, so the root hash fingerprints the whole tree.

pub mod builder;
pub mod codec;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One observed file: content digest plus the metadata carried on leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Lowercase hex content digest.
    pub hash: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, unix seconds.
    pub mtime: i64,
}

/// Flat view of a tree's files, keyed by absolute path.
///
/// The map's byte-wise lexicographic key order is the order leaves appear
/// in the tree, so iterating it reproduces tree shape deterministically.
pub type FileMap = BTreeMap<String, FileRecord>;

/// One node of the binary Merkle tree.
///
/// Leaves carry `path`/`size`/`mtime`; internal nodes carry `left`/`right`.
/// The two field sets never mix on one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub hash: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<TreeNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<TreeNode>>,

    /// Path relative to the scanned root. Present exactly on leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<i64>,
}

impl TreeNode {
    /// Leaf node for one file. The file's content digest is used directly
    /// as the node hash.
    pub fn leaf(hash: String, path: String, size: u64, mtime: i64) -> Self {
        Self {
            hash,
            left: None,
            right: None,
            path: Some(path),
            size: Some(size),
            mtime: Some(mtime),
        }
    }

    /// Internal node combining two children.
    pub fn parent(hash: String, left: TreeNode, right: TreeNode) -> Self {
        Self {
            hash,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            path: None,
            size: None,
            mtime: None,
        }
    }

    /// Bare node carrying only a hash; used for the empty-tree root.
    pub fn bare(hash: String) -> Self {
        Self {
            hash,
            left: None,
            right: None,
            path: None,
            size: None,
            mtime: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.path.is_some()
    }
}

/// A built tree plus the flat per-file view it was derived from.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    pub root: TreeNode,
    /// Absolute path of the directory that was scanned.
    pub root_path: PathBuf,
    /// Sum of all leaf sizes.
    pub total_size: u64,
    pub files: FileMap,
}

impl MerkleTree {
    /// The tree's overall fingerprint.
    pub fn root_hash(&self) -> &str {
        &self.root.hash
    }
}
