//! Error types for the treesum core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from tree building, persistence, and loading.
///
/// These abort the current operation; per-file hashing failures are
/// collected separately as [`HashFailure`] and never abort a batch.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tree file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("invalid digest in tree: {0}")]
    Digest(#[from] hex::FromHexError),
}

/// A single file that could not be hashed.
///
/// The pipeline records these and keeps going; callers get the full list
/// once the batch has run to completion.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct HashFailure {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
