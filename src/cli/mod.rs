//! CLI command implementation
//!
//! Business logic for the `trazar` binary, extracted from `main.rs` for
//! testability. Argument and environment parsing happen here, before any
//! measurement; configuration errors abort the process.

#![allow(clippy::missing_errors_doc)]

pub mod handlers;
pub use handlers::Cli;

use crate::error::Result;

/// Main CLI entrypoint
pub fn entrypoint(cli: Cli) -> Result<()> {
    let config = handlers::build_config(&cli)?;
    handlers::handle_run(&cli, config)
}
