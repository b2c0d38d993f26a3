//! CLI command handlers

pub mod commands;

pub use commands::{extract, names};

use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
pub fn init_logging(verbose: bool) {
    let default = if verbose { "sovreader=debug" } else { "sovreader=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
