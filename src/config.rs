//! Configuration loading.
//!
//! A TOML file supplies exclusion patterns for the walker and an optional
//! output path. A missing file falls back to built-in defaults; an
//! unreadable or unparsable one is an error.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Exclusion patterns applied during traversal. Patterns ending in `/`
    /// name directories; others glob-match file names.
    #[serde(default)]
    pub skip: Vec<String>,

    /// Where to write the generated tree. Unset means the default
    /// `output/<root-hash>.json` rule applies.
    #[serde(default)]
    pub output_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip: [
                ".git/",
                ".svn/",
                "node_modules/",
                "vendor/",
                "__pycache__/",
                "*.o",
                "*.so",
                "*.exe",
                "bin/",
                "dist/",
                "*.tmp",
                "*.swp",
                "*.log",
                ".DS_Store",
                "Thumbs.db",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            output_file: None,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config = toml::from_str(&data)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
