//! Treesum CLI binary.

use clap::Parser;
use std::process;
use treesum::cli::{self, Cli};
use treesum::logging;

fn main() {
    let cli = Cli::parse();
    logging::init();

    match cli::run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}
