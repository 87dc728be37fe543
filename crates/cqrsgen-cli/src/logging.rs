//! Diagnostic logging for the CLI.
//!
//! Log records go to stderr so they never mix with `--json` documents on
//! stdout.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level used when neither `--verbose` nor `RUST_LOG` asks for more.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Initialize the tracing subscriber
///
/// Configures the subscriber with:
/// - Environment filter (`RUST_LOG`), defaulting to [`default_level`]
/// - Stderr output
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
