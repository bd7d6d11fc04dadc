//! Terminal progress reporting for hashing batches.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Progress bar over a hashing batch.
///
/// Advances once per hashed file and surfaces the directory currently
/// being processed. Draws to stderr, leaving stdout for command output.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::with_template("[{bar:50}] {percent:>3}% ({pos}/{len}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        Self { bar }
    }

    /// Record one completed file, showing its parent directory.
    pub fn file_done(&self, path: &Path) {
        if let Some(dir) = path.parent().and_then(|d| d.file_name()) {
            self.bar.set_message(dir.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }

    /// Complete the bar and clear it from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
