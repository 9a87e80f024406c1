#![allow(dead_code)]

use std::sync::Arc;

use xspawn::fs::mock::MockFileSystem;
use xspawn::parse::Parser;
use xspawn::types::Platform;
use xspawn_test_utils::fake_search::FakePathSearch;

pub use xspawn_test_utils::init_tracing;

/// Parser pinned to Windows semantics, with fake collaborators.
pub fn windows_parser(search: &FakePathSearch, fs: &MockFileSystem) -> Parser {
    Parser::builder()
        .platform(Platform::Windows)
        .path_search(Arc::new(search.clone()))
        .file_system(Arc::new(fs.clone()))
        .build()
}

/// Parser pinned to POSIX semantics.
pub fn posix_parser(search: &FakePathSearch) -> Parser {
    Parser::builder()
        .platform(Platform::Posix)
        .path_search(Arc::new(search.clone()))
        .file_system(Arc::new(MockFileSystem::new()))
        .build()
}

/// Undo one round of `cmd.exe` caret escaping.
pub fn cmd_unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '^' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split a command line into argv following the MSVC runtime rules.
pub fn split_msvcrt(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quotes = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let start = i;
                while i < chars.len() && chars[i] == '\\' {
                    i += 1;
                }
                let run = i - start;
                if i < chars.len() && chars[i] == '"' {
                    current.extend(std::iter::repeat_n('\\', run / 2));
                    if run % 2 == 1 {
                        current.push('"');
                        i += 1;
                    }
                } else {
                    current.extend(std::iter::repeat_n('\\', run));
                }
                in_arg = true;
            }
            '"' => {
                if in_quotes && chars.get(i + 1) == Some(&'"') {
                    current.push('"');
                    i += 2;
                } else {
                    in_quotes = !in_quotes;
                    i += 1;
                }
                in_arg = true;
            }
            ' ' | '\t' if !in_quotes => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
                i += 1;
            }
            other => {
                current.push(other);
                in_arg = true;
                i += 1;
            }
        }
    }

    if in_arg {
        args.push(current);
    }
    args
}

/// Decode the `/c` payload of a rewritten invocation back into argv.
///
/// `/s` strips the outer quotes; `rounds` is how many times carets are
/// consumed before the target program sees its command line.
pub fn decode_cmd_line(payload: &str, rounds: usize) -> Vec<String> {
    let inner = payload
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .expect("payload wrapped in outer quotes");
    let mut line = inner.to_string();
    for _ in 0..rounds {
        line = cmd_unescape(&line);
    }
    split_msvcrt(&line)
}
