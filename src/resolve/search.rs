// src/resolve/search.rs

//! Pluggable executable search.
//!
//! The resolver talks to a `PathSearch` instead of calling `which` directly,
//! so tests can swap in a fake that records every lookup and so the search
//! can be told which directory counts as "current".

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::errors::{Result, SpawnError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::Platform;

/// Whether a search applies the platform's executable-extension rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionRule {
    /// Honour `PATHEXT` (Windows) / the executable bit (POSIX).
    Platform,
    /// Accept any file with exactly the given name.
    Ignore,
}

/// One lookup handed to a [`PathSearch`].
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    /// Value of the search-path variable, if set.
    pub path: Option<&'a str>,
    /// Directory relative names are searched from.
    pub cwd: &'a Path,
    pub extensions: ExtensionRule,
}

/// Finds the first executable matching a name.
///
/// Fails with [`SpawnError::NotFound`] when nothing matches.
pub trait PathSearch: Send + Sync + Debug {
    fn search(&self, name: &str, query: &SearchQuery<'_>) -> Result<PathBuf>;
}

/// Extensions tried for a bare name when Windows lookup is emulated on a
/// non-Windows host.
const WINDOWS_DEFAULT_PATHEXT: &[&str] = &[".com", ".exe", ".bat", ".cmd"];

/// Production search backed by the `which` crate.
///
/// `which::which_in` is cwd-aware, so no process-wide directory change is
/// needed and concurrent resolutions with different `cwd`s don't race.
/// When the target platform differs from the host (a Windows parse on a
/// POSIX machine), `which` would apply the host's rules, so the lookup is
/// emulated through the [`FileSystem`] instead.
#[derive(Debug, Clone)]
pub struct WhichSearch {
    fs: Arc<dyn FileSystem>,
    platform: Platform,
}

impl WhichSearch {
    pub fn new(platform: Platform, fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, platform }
    }

    /// Search with the host's rules on the real filesystem.
    pub fn host() -> Self {
        Self::new(Platform::current(), Arc::new(RealFileSystem))
    }

    fn search_emulated(
        &self,
        name: &str,
        query: &SearchQuery<'_>,
        extensions: ExtensionRule,
    ) -> Option<PathBuf> {
        let names = self.candidate_names(name, extensions);

        if self.is_path_like(name) {
            return names
                .iter()
                .map(|candidate| query.cwd.join(candidate))
                .find(|full| self.fs.is_file(full));
        }

        let mut dirs: Vec<PathBuf> = Vec::new();
        // Windows looks in the current directory before the search path.
        if self.platform.is_windows() {
            dirs.push(query.cwd.to_path_buf());
        }
        if let Some(path) = query.path {
            dirs.extend(
                split_search_path(path, self.platform)
                    .into_iter()
                    .map(|dir| query.cwd.join(dir)),
            );
        }

        dirs.iter()
            .flat_map(|dir| names.iter().map(move |candidate| dir.join(candidate)))
            .find(|full| self.fs.is_file(full))
    }

    fn candidate_names(&self, name: &str, extensions: ExtensionRule) -> Vec<String> {
        if extensions == ExtensionRule::Ignore || !self.platform.is_windows() {
            return vec![name.to_string()];
        }

        let lower = name.to_ascii_lowercase();
        if WINDOWS_DEFAULT_PATHEXT.iter().any(|ext| lower.ends_with(ext)) {
            return vec![name.to_string()];
        }
        WINDOWS_DEFAULT_PATHEXT
            .iter()
            .map(|ext| format!("{name}{ext}"))
            .collect()
    }

    fn is_path_like(&self, name: &str) -> bool {
        name.contains('/')
            || (self.platform.is_windows() && name.contains('\\'))
            || Path::new(name).is_absolute()
    }
}

impl Default for WhichSearch {
    fn default() -> Self {
        Self::host()
    }
}

impl PathSearch for WhichSearch {
    fn search(&self, name: &str, query: &SearchQuery<'_>) -> Result<PathBuf> {
        let found = match query.extensions {
            ExtensionRule::Platform if self.platform == Platform::current() => {
                which::which_in(name, query.path, query.cwd).ok()
            }
            rule => self.search_emulated(name, query, rule),
        };

        trace!(
            name,
            extensions = ?query.extensions,
            platform = ?self.platform,
            ?found,
            "path search"
        );
        found.ok_or_else(|| SpawnError::not_found(name, "which"))
    }
}

/// Split a search-path value the way `platform` does: `;` on Windows, `:`
/// on POSIX. Empty entries are skipped.
pub fn split_search_path(value: &str, platform: Platform) -> Vec<PathBuf> {
    let separator = if platform.is_windows() { ';' } else { ':' };
    value
        .split(separator)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}
