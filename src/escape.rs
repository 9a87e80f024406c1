// src/escape.rs

//! Escaping for `cmd.exe` command lines.
//!
//! Two layers of parsing happen when a command line goes through the
//! command interpreter:
//!
//! 1. `cmd.exe` itself, which gives special meaning to metacharacters such as
//!    `&`, `|`, `%` and `^`. Each one is neutralised with a `^` prefix.
//! 2. The target program's argv splitter (the MSVC runtime rules), which
//!    groups on double quotes and treats backslashes before a quote
//!    specially. Arguments are quoted so that this stage rebuilds them
//!    byte-for-byte.
//!
//! Backslash runs are counted with a single left-to-right scan, so the work
//! is linear in the input length no matter how the input is shaped.

use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::cache::BoundedCache;

/// Characters `cmd.exe` interprets and which therefore get a `^` prefix.
pub const META_CHARS: &[char] = &[
    '(', ')', '[', ']', '%', '!', '^', '"', '`', '<', '>', '&', '|', ';', ',', ' ', '*', '?',
];

/// Capacity of the shared escape cache.
pub const ESCAPE_CACHE_CAPACITY: usize = 500;

pub fn is_meta_char(ch: char) -> bool {
    META_CHARS.contains(&ch)
}

/// Prefix every metacharacter with `^`.
pub fn escape_meta_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    for ch in raw.chars() {
        if is_meta_char(ch) {
            out.push('^');
        }
        out.push(ch);
    }
    out
}

/// Escape a command name for use at the head of a `cmd.exe` command line.
pub fn escape_command(raw: &str) -> String {
    escape_meta_chars(raw)
}

/// Quote and escape a single argument.
///
/// After `cmd.exe` strips the carets (twice when `double_escape` is set) and
/// the program splits its command line, the result is exactly `raw` as one
/// argument.
pub fn escape_argument(raw: &str, double_escape: bool) -> String {
    let quoted = quote_argument(raw);
    let escaped = escape_meta_chars(&quoted);
    if double_escape {
        escape_meta_chars(&escaped)
    } else {
        escaped
    }
}

/// Wrap `raw` in double quotes using the MSVC argv conventions.
///
/// - `n` backslashes followed by `"` become `2n + 1` backslashes and `"`.
/// - `n` trailing backslashes become `2n`, since the closing quote follows.
/// - Any other backslash is literal.
pub fn quote_argument(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');

    let mut backslashes = 0usize;
    for ch in raw.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                push_backslashes(&mut out, backslashes * 2 + 1);
                out.push('"');
                backslashes = 0;
            }
            other => {
                push_backslashes(&mut out, backslashes);
                out.push(other);
                backslashes = 0;
            }
        }
    }
    push_backslashes(&mut out, backslashes * 2);

    out.push('"');
    out
}

fn push_backslashes(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n('\\', count));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeMode {
    Command,
    Argument { double: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EscapeKey {
    raw: String,
    mode: EscapeMode,
}

/// Cached front end for [`escape_command`] / [`escape_argument`].
#[derive(Debug)]
pub struct Escaper {
    cache: Mutex<BoundedCache<EscapeKey, String>>,
}

impl Escaper {
    pub fn new() -> Self {
        Self::with_capacity(ESCAPE_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    pub fn command(&self, raw: &str) -> String {
        self.cached(raw, EscapeMode::Command)
    }

    pub fn argument(&self, raw: &str, double_escape: bool) -> String {
        self.cached(
            raw,
            EscapeMode::Argument {
                double: double_escape,
            },
        )
    }

    pub fn cached_entries(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, raw: &str, mode: EscapeMode) -> String {
        let key = EscapeKey {
            raw: raw.to_string(),
            mode,
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(&key) {
            trace!(?mode, "escape cache hit");
            return hit.clone();
        }

        let escaped = match mode {
            EscapeMode::Command => escape_command(raw),
            EscapeMode::Argument { double } => escape_argument(raw, double),
        };
        cache.insert(key, escaped.clone());
        escaped
    }
}

impl Default for Escaper {
    fn default() -> Self {
        Self::new()
    }
}
