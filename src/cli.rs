// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::Platform;

/// Command-line arguments for `xspawn`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "xspawn",
    version,
    about = "Launch a command the same way on POSIX and Windows.",
    long_about = None
)]
pub struct CliArgs {
    /// Command to launch.
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Arguments passed to the command.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Spawn options file (TOML). Flags below override its values.
    #[arg(long, value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Working directory for resolution and for the child.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Run through the platform's default shell.
    #[arg(long, conflicts_with = "shell_program")]
    pub shell: bool,

    /// Run through this shell program.
    #[arg(long, value_name = "PATH")]
    pub shell_program: Option<String>,

    /// Parse for this platform instead of the host. Implies `--dry-run`.
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<PlatformArg>,

    /// Print the parsed invocation as TOML instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `XSPAWN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum PlatformArg {
    Posix,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Posix => Platform::Posix,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
