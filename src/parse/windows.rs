// src/parse/windows.rs

//! Re-expressing an invocation as a `cmd.exe` command line.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::env::Environment;
use crate::escape::Escaper;
use crate::types::ParsedInvocation;

/// Files the OS can start directly, without the command interpreter.
static EXECUTABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:com|exe)$").expect("valid executable regex"));

/// Shims generated into a package's local binary directory.
static CMD_SHIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)node_modules[\\/]\.bin[\\/][^\\/]+\.cmd$").expect("valid cmd-shim regex")
});

/// Interpreter used when `COMSPEC` is not set.
pub const DEFAULT_COMSPEC: &str = "cmd.exe";

pub fn is_native_executable(file: &Path) -> bool {
    EXECUTABLE_RE.is_match(&file.to_string_lossy())
}

/// Cmd-shims call the interpreter a second time, so their arguments pass
/// through two rounds of caret removal.
pub fn is_cmd_shim(file: &Path) -> bool {
    CMD_SHIM_RE.is_match(&file.to_string_lossy())
}

/// Interpreter path: `COMSPEC` from the effective environment, else `cmd.exe`.
pub fn comspec(env: &Environment) -> String {
    env.get_ignore_case("COMSPEC")
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_COMSPEC)
        .to_string()
}

/// Rewrite `parsed` into `<comspec> /d /s /c "<escaped command line>"`.
///
/// `command_file` is what will actually execute (interpreter or script);
/// it decides whether arguments need double escaping.
pub fn rewrite_for_cmd(
    parsed: &mut ParsedInvocation,
    command_file: Option<&Path>,
    escaper: &Escaper,
    env: &Environment,
) {
    let double_escape = command_file.is_some_and(is_cmd_shim);

    // `foo/bar` must become `foo\bar` or cmd.exe fails with "not found".
    let command = normalize_windows_path(&parsed.command);

    let mut line = escaper.command(&command);
    for arg in &parsed.args {
        line.push(' ');
        line.push_str(&escaper.argument(arg, double_escape));
    }

    parsed.args = vec![
        "/d".to_string(),
        "/s".to_string(),
        "/c".to_string(),
        format!("\"{line}\""),
    ];
    parsed.command = comspec(env);
    parsed.options.windows_verbatim_arguments = true;
}

/// Lexical win32 path normalisation.
///
/// Converts `/` to `\`, collapses repeated separators, drops `.` segments
/// and folds `..` segments. A drive (`C:`) or UNC (`\\server\share`) root
/// and a trailing separator are preserved. An empty result becomes `.`.
pub fn normalize_windows_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let unified = path.replace('/', "\\");
    let (root, rest) = split_root(&unified);
    let absolute = root.ends_with('\\');
    let trailing = rest.ends_with('\\') && !rest.is_empty();

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('\\') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut out = root;
    out.push_str(&segments.join("\\"));
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with('\\') {
        out.push('\\');
    }
    out
}

/// Split off a drive, UNC or root prefix (separators already unified).
///
/// The returned root ends with `\` whenever the path is absolute.
fn split_root(path: &str) -> (String, &str) {
    let bytes = path.as_bytes();

    // \\server\share\...
    if let Some(after) = path.strip_prefix("\\\\") {
        let mut parts = after.splitn(3, '\\');
        if let (Some(server), Some(share)) = (parts.next(), parts.next()) {
            if !server.is_empty() && !share.is_empty() {
                let share_end = 2 + server.len() + 1 + share.len();
                let rest = path[share_end..].trim_start_matches('\\');
                return (format!("\\\\{server}\\{share}\\"), rest);
            }
        }
    }

    // C:\... or C:...
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.len() >= 3 && bytes[2] == b'\\' {
            return (path[..3].to_string(), &path[3..]);
        }
        return (path[..2].to_string(), &path[2..]);
    }

    if path.starts_with('\\') {
        return ("\\".to_string(), &path[1..]);
    }

    (String::new(), path)
}
