// src/logging.rs

//! Logging setup for `xspawn` using `tracing` + `tracing-subscriber`.
//!
//! The filter is built from, in order of precedence:
//! 1. `--log-level`, applied to `xspawn` targets only.
//! 2. `XSPAWN_LOG`: either a bare level (`debug`), again scoped to `xspawn`,
//!    or a full `EnvFilter` directive string (`xspawn=trace,which=debug`).
//! 3. `warn` everywhere.
//!
//! Logs go to STDERR so the child's stdout stays untouched.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "XSPAWN_LOG";

const CRATE_TARGET: &str = "xspawn";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

/// Filter for the given CLI level and `XSPAWN_LOG` value.
///
/// An `XSPAWN_LOG` value that doesn't parse as a directive falls back to
/// the default.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return crate_filter(level_from_log_level(lvl));
    }

    let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) else {
        return EnvFilter::new(DEFAULT_DIRECTIVE);
    };

    match parse_level_str(value) {
        Some(level) => crate_filter(level),
        None => EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// `xspawn=<level>` plus the default for every other target.
fn crate_filter(level: Level) -> EnvFilter {
    EnvFilter::new(format!(
        "{CRATE_TARGET}={},{DEFAULT_DIRECTIVE}",
        level.as_str().to_ascii_lowercase()
    ))
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
