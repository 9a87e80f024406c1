// src/lib.rs

//! Cross-platform process launch shim.
//!
//! Given a command, its arguments and spawn options, produce the exact
//! `(command, args, options)` triple the OS process-creation call should
//! receive so that `command arg1 arg2` behaves the same on POSIX and
//! Windows:
//!
//! - [`resolve`] finds the executable on the search path.
//! - [`shebang`] reroutes scripts through the interpreter named on their
//!   `#!` line.
//! - [`parse`] decides whether `cmd.exe` is needed and rewrites the
//!   invocation when it is, using [`escape`] so the command line re-parses
//!   into the original argument vector.
//! - [`spawn`] hands the result to `std::process`.

pub mod cache;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod escape;
pub mod fs;
pub mod logging;
pub mod parse;
pub mod resolve;
pub mod shebang;
pub mod spawn;
pub mod types;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_options;
use crate::parse::{default_parser, Parser};
use crate::types::{Shell, SpawnOptions};

pub use crate::errors::SpawnError;
pub use crate::spawn::{spawn, spawn_sync, SpawnedChild};
pub use crate::types::{Original, ParsedInvocation, Platform, SpawnRequest};

/// Parse `request` with the process-wide parser.
pub fn parse(request: &SpawnRequest) -> ParsedInvocation {
    default_parser().parse(request)
}

/// High-level entry point used by `main.rs`.
///
/// Returns the exit code `xspawn` should terminate with.
pub fn run(args: CliArgs) -> Result<i32> {
    let options = cli_options(&args)?;
    let request = SpawnRequest::new(args.command.clone())
        .args(args.args.clone())
        .options(options);

    if args.dry_run || args.platform.is_some() {
        let parser = match args.platform {
            Some(platform) => Parser::builder().platform(platform.into()).build(),
            None => Parser::builder().build(),
        };
        print_dry_run(&parser.parse(&request))?;
        return Ok(0);
    }

    let mut child = spawn(&request).with_context(|| format!("launching {:?}", args.command))?;
    let status = child.wait()?;
    debug!(?status, "child exited");

    Ok(status.code().unwrap_or(1))
}

/// Options file first, then command-line overrides.
fn cli_options(args: &CliArgs) -> Result<SpawnOptions> {
    let mut options = match args.options {
        Some(ref path) => {
            load_options(path).with_context(|| format!("loading options from {:?}", path))?
        }
        None => SpawnOptions::default(),
    };

    if let Some(ref cwd) = args.cwd {
        options.cwd = Some(cwd.clone());
    }
    if let Some(ref program) = args.shell_program {
        options.shell = Shell::Program(program.clone());
    } else if args.shell {
        options.shell = Shell::Enabled(true);
    }

    Ok(options)
}

fn print_dry_run(parsed: &ParsedInvocation) -> Result<()> {
    let rendered = toml::to_string_pretty(parsed).context("rendering parsed invocation")?;
    println!("{rendered}");
    Ok(())
}
