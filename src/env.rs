// src/env.rs

//! Effective environment for a single request.
//!
//! Resolution never reads process-global state on its own: the variables
//! and working directory it should see are captured here once per request
//! (from the options when given, from the process otherwise) and threaded
//! through explicitly.

use std::collections::BTreeMap;
use std::env as stdenv;
use std::path::{Component, Path, PathBuf};

use crate::types::{Platform, SpawnOptions};

/// Variables and working directory seen by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub vars: BTreeMap<String, String>,
    pub cwd: PathBuf,
}

impl Environment {
    /// Capture the current process environment and working directory.
    pub fn capture() -> Self {
        Self {
            vars: stdenv::vars().collect(),
            cwd: process_cwd(),
        }
    }

    /// Environment a request resolves against.
    ///
    /// - `options.env` replaces the process variables wholesale.
    /// - `options.cwd` is taken relative to the process working directory
    ///   when it isn't absolute.
    pub fn effective(options: &SpawnOptions) -> Self {
        let vars = match options.env {
            Some(ref vars) => vars.clone(),
            None => stdenv::vars().collect(),
        };

        let cwd = match options.cwd {
            Some(ref cwd) if cwd.is_absolute() => clean_path(cwd),
            Some(ref cwd) => clean_path(&process_cwd().join(cwd)),
            None => process_cwd(),
        };

        Self { vars, cwd }
    }

    /// Value of the search-path variable for `platform`.
    pub fn path_value(&self, platform: Platform) -> Option<&str> {
        let key = path_key_for(&self.vars, platform);
        self.vars.get(&key).map(String::as_str)
    }

    /// Case-insensitive lookup, the way Windows treats variable names.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Name of the variable holding the executable search path.
///
/// POSIX always uses `PATH`. Windows variable names are case-insensitive and
/// the casing varies between hosts (`Path`, `PATH`), so the last key that
/// matches case-insensitively wins, falling back to `Path`.
pub fn path_key_for(vars: &BTreeMap<String, String>, platform: Platform) -> String {
    match platform {
        Platform::Posix => "PATH".to_string(),
        Platform::Windows => vars
            .keys()
            .rev()
            .find(|k| k.eq_ignore_ascii_case("PATH"))
            .cloned()
            .unwrap_or_else(|| "Path".to_string()),
    }
}

fn process_cwd() -> PathBuf {
    stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Lexically remove `.` and fold `..` components.
///
/// Does not touch the filesystem, so symlinks are not followed.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => true,
                    _ => false,
                };
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
