// src/shebang.rs

//! Interpreter directive (`#!`) detection.
//!
//! Windows can't run a script by handing its path to the OS, so when a
//! resolved file starts with `#!/usr/bin/env node` the invocation is turned
//! into `node <script> args...` before deciding whether a shell is needed.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::Environment;
use crate::fs::FileSystem;
use crate::resolve::Resolver;
use crate::types::ParsedInvocation;

/// How many bytes of a file are inspected for a directive.
pub const SHEBANG_READ_LIMIT: usize = 150;

/// Interpreter named by a `#!` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shebang {
    /// Bare interpreter name, e.g. `node` or `sh`.
    pub interpreter: String,
    /// Single optional argument following the interpreter path.
    pub argument: Option<String>,
}

/// Parse the directive on the first line of `head`, if any.
///
/// `#!/usr/bin/env node` yields `node`; `#!/bin/sh -e` yields `sh` with the
/// argument `-e`. A bare `#!/usr/bin/env` yields nothing.
pub fn parse_shebang(head: &[u8]) -> Option<Shebang> {
    let first_line = head.split(|b| *b == b'\n').next()?;
    let first_line = String::from_utf8_lossy(first_line);
    let directive = first_line.strip_prefix("#!")?;
    let directive = directive.strip_prefix(' ').unwrap_or(directive);
    let directive = directive.trim_end_matches('\r');

    let mut tokens = directive.split(' ');
    let path = tokens.next().filter(|p| !p.is_empty())?;
    let argument = tokens
        .next()
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    let binary = path.rsplit('/').next().unwrap_or(path);
    if binary == "env" {
        return argument.map(|interpreter| Shebang {
            interpreter,
            argument: None,
        });
    }

    Some(Shebang {
        interpreter: binary.to_string(),
        argument,
    })
}

/// Read the head of `path` and parse its directive.
///
/// Unreadable files are treated as having no directive.
pub fn read_shebang(fs: &dyn FileSystem, path: &Path) -> Option<Shebang> {
    match fs.read_prefix(path, SHEBANG_READ_LIMIT) {
        Ok(head) => parse_shebang(&head),
        Err(err) => {
            debug!(?path, error = %err, "could not read file for shebang; assuming none");
            None
        }
    }
}

/// Resolve `parsed.command`, rewriting the invocation through its
/// interpreter when the resolved file carries a directive.
///
/// Sets `parsed.file` to the resolved script and returns the path of the
/// program that will actually run: the interpreter when one was detected,
/// the script itself otherwise, or `None` when nothing resolves.
pub fn detect_shebang(
    parsed: &mut ParsedInvocation,
    resolver: &Resolver,
    fs: &dyn FileSystem,
    env: &Environment,
) -> Option<PathBuf> {
    parsed.file = resolver.resolve(&parsed.command, env);

    let file = parsed.file.clone()?;
    let Some(shebang) = read_shebang(fs, &file) else {
        return Some(file);
    };

    debug!(
        command = %parsed.command,
        file = ?file,
        interpreter = %shebang.interpreter,
        "detected shebang"
    );

    let mut prefix = Vec::with_capacity(2);
    if let Some(argument) = shebang.argument {
        prefix.push(argument);
    }
    prefix.push(file.to_string_lossy().into_owned());
    parsed.args.splice(0..0, prefix);
    parsed.command = shebang.interpreter;

    resolver.resolve(&parsed.command, env)
}
