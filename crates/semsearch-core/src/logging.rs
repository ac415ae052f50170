//! Logger setup for the `semsearch` binary.
//!
//! Library crates only talk to the `log` facade; this installs `twyg` as
//! the backend once at start-up.

use anyhow::Result;
use twyg::{LogLevel, OptsBuilder};

use crate::Config;

/// Map a configured level name onto a `twyg` level. Unknown names fall
/// back to `info`.
pub fn parse_level(level: &str) -> LogLevel {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

/// Install the global logger from the loaded configuration.
///
/// # Errors
///
/// Returns an error if the options are rejected or a logger is already set.
pub fn init(config: &Config) -> Result<()> {
    let opts = OptsBuilder::new()
        .coloured(config.log_coloured)
        .level(parse_level(&config.log_level))
        .report_caller(false)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logger options: {:?}", e))?;

    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Could not set up logger: {:?}", e))?;

    Ok(())
}
