//! CLI module for clustereval
//!
//! - Argument parsing (`args`)
//! - Runtime setup and config layering (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, InputArgs};
pub use setup::{apply_input_overrides, apply_parallel_overrides, resolve_config};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    use clap::Parser;
    Cli::parse()
}
