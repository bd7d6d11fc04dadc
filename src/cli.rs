//! Command-line surface.
//!
//! Two subcommands: `scan` generates and saves a tree, `compare` checks a
//! saved tree against the current state of a directory. Exit codes are
//! derived from the core's outputs here; the core itself never exits.

use crate::compare;
use crate::config::Config;
use crate::pipeline;
use crate::progress::Progress;
use crate::tree::{builder, codec, FileMap, FileRecord, MerkleTree};
use crate::walker::{self, FileMeta};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Nothing changed (or `scan` completed).
pub const EXIT_CLEAN: i32 = 0;
/// Changes were detected by `compare`.
pub const EXIT_CHANGES: i32 = 1;
/// One or more files could not be hashed.
pub const EXIT_HASH_ERRORS: i32 = 2;

/// Treesum - directory tree fingerprinting and change detection
#[derive(Parser)]
#[command(name = "treesum")]
#[command(about = "Directory tree fingerprinting and change detection using Merkle trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and save its Merkle tree
    Scan {
        /// Directory to scan
        directory: PathBuf,

        /// Output file (default: output/<root-hash>.json)
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Number of hashing workers (default: 2x logical CPUs)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Compare a saved tree against the current directory state
    Compare {
        /// Saved tree file
        tree: PathBuf,

        /// Directory to scan
        directory: PathBuf,

        /// Config file path
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Number of hashing workers (default: 2x logical CPUs)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

/// Run the parsed command, returning the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan {
            directory,
            output,
            config,
            workers,
        } => scan(&directory, output, &config, workers),
        Commands::Compare {
            tree,
            directory,
            config,
            workers,
        } => compare_saved(&tree, &directory, &config, workers),
    }
}

fn scan(
    directory: &Path,
    output: Option<PathBuf>,
    config_path: &Path,
    workers: Option<usize>,
) -> Result<i32> {
    let config = Config::load(config_path).context("failed to load config")?;
    let directory = std::path::absolute(directory).context("failed to get absolute path")?;
    println!("Scanning directory: {}", directory.display());

    let (tree, failed) = build_tree(&directory, &config, workers)?;

    let output = match output.or_else(|| configured_output(&config)) {
        Some(path) => path,
        None => Path::new("output").join(format!("{}.json", tree.root_hash())),
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create output directory")?;
        }
    }

    codec::save(&tree, &output).context("failed to save tree")?;

    println!("✓ Merkle tree generated successfully");
    println!("  Root hash: {}", tree.root_hash());
    println!("  Files: {}", tree.files.len());
    println!("  Output: {}", output.display());
    if failed > 0 {
        println!("\n⚠ Skipped {failed} files due to errors");
    }

    Ok(EXIT_CLEAN)
}

fn compare_saved(
    tree_path: &Path,
    directory: &Path,
    config_path: &Path,
    workers: Option<usize>,
) -> Result<i32> {
    let old = codec::load(tree_path).context("failed to load tree")?;
    println!("Loaded saved tree (root: {}...)", old.root_hash());

    let config = Config::load(config_path).context("failed to load config")?;
    let directory = std::path::absolute(directory).context("failed to get absolute path")?;
    println!("Scanning directory: {}", directory.display());

    let (new, failed) = build_tree(&directory, &config, workers)?;

    let result = compare::compare(&old, &new);
    println!("{}", compare::format_report(&result));

    if failed > 0 {
        println!("Skipped: {failed} files");
        return Ok(EXIT_HASH_ERRORS);
    }
    if result.has_changes() {
        return Ok(EXIT_CHANGES);
    }
    Ok(EXIT_CLEAN)
}

/// Walk, hash, and build a tree for `directory`. Returns the tree and the
/// number of files that could not be hashed.
fn build_tree(
    directory: &Path,
    config: &Config,
    workers: Option<usize>,
) -> Result<(MerkleTree, usize)> {
    let walk = walker::walk(directory, &config.skip).context("failed to walk directory")?;
    println!("Found {} files", walk.files.len());
    println!("Hashing files...");

    let workers = workers.unwrap_or_else(default_workers);
    info!(files = walk.files.len(), workers, "hashing files");

    let progress = Progress::new(walk.files.len() as u64);
    let outcome = pipeline::hash_files(&walk.files, workers, Some(&progress));
    progress.finish();

    let files = index_files(&walk.files, &outcome.hashes);
    let tree = builder::build(files, directory).context("failed to build merkle tree")?;
    Ok((tree, outcome.errors.len()))
}

/// Join walker metadata with pipeline digests into the builder's file map.
/// Files that failed to hash are absent from the digest map and drop out.
fn index_files(files: &[FileMeta], hashes: &HashMap<PathBuf, String>) -> FileMap {
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

fn configured_output(config: &Config) -> Option<PathBuf> {
    config
        .output_file
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

fn default_workers() -> usize {
    num_cpus::get() * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["treesum", "scan", "/some/dir", "-w", "4"]).unwrap();
        match cli.command {
            Commands::Scan {
                directory, workers, ..
            } => {
                assert_eq!(directory, PathBuf::from("/some/dir"));
                assert_eq!(workers, Some(4));
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_parse_compare() {
        let cli =
            Cli::try_parse_from(["treesum", "compare", "tree.json", "/some/dir"]).unwrap();
        match cli.command {
            Commands::Compare {
                tree, directory, ..
            } => {
                assert_eq!(tree, PathBuf::from("tree.json"));
                assert_eq!(directory, PathBuf::from("/some/dir"));
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_index_files_drops_unhashed() {
        let files = vec![
            FileMeta {
                path: PathBuf::from("/scan/ok.txt"),
                size: 3,
                mtime: 100,
            },
            FileMeta {
                path: PathBuf::from("/scan/failed.txt"),
                size: 9,
                mtime: 200,
            },
        ];
        let mut hashes = HashMap::new();
        hashes.insert(PathBuf::from("/scan/ok.txt"), "abcd".to_string());

        let map = index_files(&files, &hashes);
        assert_eq!(map.len(), 1);
        assert_eq!(map["/scan/ok.txt"].hash, "abcd");
        assert_eq!(map["/scan/ok.txt"].size, 3);
    }

    #[test]
    fn test_configured_output_ignores_empty() {
        let mut config = Config::default();
        assert!(configured_output(&config).is_none());

        config.output_file = Some(String::new());
        assert!(configured_output(&config).is_none());

        config.output_file = Some("trees/out.json".to_string());
        assert_eq!(
            configured_output(&config),
            Some(PathBuf::from("trees/out.json"))
        );
    }
}
