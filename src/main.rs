//! Trazar CLI - trace-replay performance harness
//!
//! Replays recorded rendering traces against every measurable target and
//! reports converged timing statistics. See `trazar --help` for the
//! option surface.

use clap::Parser;

use trazar::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli::entrypoint(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
