// Log setup
//
// The terminal belongs to the UI, so log lines only go to a file, and only
// when one is requested. Without `--log-file` no subscriber is installed and
// tracing macros are no-ops.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset
const DEFAULT_FILTER: &str = "info";

/// Install a plain-text file subscriber
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set log subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "File logging enabled");
    Ok(())
}
