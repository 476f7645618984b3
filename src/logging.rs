// src/logging.rs
// =============================================================================
// Logging setup.
//
// Logs go to stderr through tracing-subscriber, so stdout only carries the
// report (summary, tree, result lines) and can be piped safely.
//
// RUST_LOG overrides the defaults, e.g. RUST_LOG=dirhound=trace.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("dirhound=debug,warn")
    } else {
        EnvFilter::new("dirhound=info,warn")
    }
}
