// src/spawn.rs

//! Handing a parsed invocation to `std::process`.
//!
//! Process creation itself belongs to the OS; this module only maps a
//! [`ParsedInvocation`] onto a `Command` and patches one gap: on Windows a
//! command run through `cmd.exe` that doesn't exist surfaces as exit code 1
//! instead of a spawn error, so that case is turned back into
//! [`SpawnError::NotFound`].

use std::io;
use std::process::{Child, Command, ExitStatus, Output};

use tracing::{debug, info};

use crate::env::Environment;
use crate::errors::{Result, SpawnError};
use crate::parse::{default_parser, windows::comspec, Parser};
use crate::types::{ParsedInvocation, Platform, SpawnRequest};

const SYSCALL_SPAWN: &str = "spawn";
const SYSCALL_SPAWN_SYNC: &str = "spawnSync";

/// Build the `Command` for `parsed` as process creation on `platform`
/// would run it.
///
/// The caller's `shell` option is applied here, the way the OS layer
/// treats it: `/bin/sh -c <line>` on POSIX, `<comspec> /d /s /c "<line>"`
/// on Windows.
pub fn build_command(parsed: &ParsedInvocation, platform: Platform) -> Command {
    let options = &parsed.options;
    let (program, args, verbatim) = if options.shell.is_requested() {
        let line = std::iter::once(parsed.command.as_str())
            .chain(parsed.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        match platform {
            Platform::Windows => {
                let program = match options.shell.program() {
                    Some(program) => program.to_string(),
                    None => comspec(&Environment::effective(options)),
                };
                let args = vec![
                    "/d".to_string(),
                    "/s".to_string(),
                    "/c".to_string(),
                    format!("\"{line}\""),
                ];
                (program, args, true)
            }
            Platform::Posix => {
                let program = options.shell.program().unwrap_or("/bin/sh").to_string();
                (program, vec!["-c".to_string(), line], false)
            }
        }
    } else {
        (
            parsed.command.clone(),
            parsed.args.clone(),
            options.windows_verbatim_arguments,
        )
    };

    let mut cmd = Command::new(&program);
    push_args(&mut cmd, &args, verbatim);

    if let Some(ref cwd) = options.cwd {
        cmd.current_dir(cwd);
    }
    if let Some(ref vars) = options.env {
        cmd.env_clear().envs(vars);
    }

    cmd
}

#[cfg(windows)]
fn push_args(cmd: &mut Command, args: &[String], verbatim: bool) {
    use std::os::windows::process::CommandExt;

    if verbatim {
        for arg in args {
            cmd.raw_arg(arg);
        }
    } else {
        cmd.args(args);
    }
}

#[cfg(not(windows))]
fn push_args(cmd: &mut Command, args: &[String], _verbatim: bool) {
    cmd.args(args);
}

/// Detect a "command not found" that only shows up as an exit code.
///
/// On Windows, exit code 1 for an invocation whose command never resolved
/// means `cmd.exe` couldn't find it. Everywhere else returns `None`.
pub fn verify_not_found(
    platform: Platform,
    code: Option<i32>,
    parsed: &ParsedInvocation,
    syscall: &str,
) -> Option<SpawnError> {
    if platform.is_windows() && code == Some(1) && parsed.file.is_none() {
        return Some(SpawnError::not_found(&parsed.original.command, syscall));
    }
    None
}

/// A running child together with the invocation that started it.
#[derive(Debug)]
pub struct SpawnedChild {
    child: Child,
    parsed: ParsedInvocation,
    platform: Platform,
}

impl SpawnedChild {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn parsed(&self) -> &ParsedInvocation {
        &self.parsed
    }

    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Wait for exit, reporting an unresolved command as `NotFound`.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait()?;
        if let Some(err) = verify_not_found(self.platform, status.code(), &self.parsed, SYSCALL_SPAWN)
        {
            return Err(err);
        }
        Ok(status)
    }
}

/// Parse `request` with `parser` and start the child.
pub fn spawn_with(parser: &Parser, request: &SpawnRequest) -> Result<SpawnedChild> {
    let parsed = parser.parse(request);
    let platform = Platform::current();

    info!(
        command = %parsed.command,
        args = ?parsed.args,
        file = ?parsed.file,
        "spawning process"
    );

    let child = build_command(&parsed, platform)
        .spawn()
        .map_err(|err| map_spawn_error(err, &parsed, SYSCALL_SPAWN))?;

    Ok(SpawnedChild {
        child,
        parsed,
        platform,
    })
}

/// Parse `request` with `parser`, run it to completion and collect output.
pub fn spawn_sync_with(parser: &Parser, request: &SpawnRequest) -> Result<Output> {
    let parsed = parser.parse(request);
    let platform = Platform::current();

    debug!(command = %parsed.command, args = ?parsed.args, "running process to completion");

    let output = build_command(&parsed, platform)
        .output()
        .map_err(|err| map_spawn_error(err, &parsed, SYSCALL_SPAWN_SYNC))?;

    if let Some(err) = verify_not_found(platform, output.status.code(), &parsed, SYSCALL_SPAWN_SYNC)
    {
        return Err(err);
    }
    Ok(output)
}

/// [`spawn_with`] using the process-wide parser.
pub fn spawn(request: &SpawnRequest) -> Result<SpawnedChild> {
    spawn_with(default_parser(), request)
}

/// [`spawn_sync_with`] using the process-wide parser.
pub fn spawn_sync(request: &SpawnRequest) -> Result<Output> {
    spawn_sync_with(default_parser(), request)
}

fn map_spawn_error(err: io::Error, parsed: &ParsedInvocation, syscall: &str) -> SpawnError {
    if err.kind() == io::ErrorKind::NotFound {
        debug!(command = %parsed.original.command, "process creation reported not found");
        return SpawnError::not_found(&parsed.original.command, syscall);
    }
    SpawnError::IoError(err)
}
