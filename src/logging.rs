// src/logging.rs

//! `tracing-subscriber` setup for the `flowdag` binary.
//!
//! The filter is taken from `--log-level` if given, otherwise from the
//! `FLOWDAG_LOG` environment variable (full `EnvFilter` syntax, e.g.
//! `flowdag=debug,warn`), otherwise `info`. Logs go to stderr so the dry-run
//! listing and the final summary on stdout stay clean.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding the log filter when no flag is given.
pub const LOG_ENV: &str = "FLOWDAG_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Pick the filter directive: CLI flag, then a non-blank env value, then `info`.
pub fn filter_directive(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_directive(level).to_string();
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(cli_level, env_value.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow!("invalid log filter `{directive}` (from {LOG_ENV} or --log-level): {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
