// src/resolve/mod.rs

//! Command resolution: bare command name → absolute executable path.
//!
//! - [`search`] holds the `PathSearch` abstraction and the `which`-backed
//!   production implementation.
//!
//! Outcomes are cached per `(command, cwd, search path)`, failures
//! included, so repeated launches of the same command skip the filesystem.

pub mod search;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::cache::BoundedCache;
use crate::env::{clean_path, Environment};
use crate::types::Platform;

pub use search::{split_search_path, ExtensionRule, PathSearch, SearchQuery, WhichSearch};

/// Capacity of the resolution cache.
pub const RESOLVE_CACHE_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolveKey {
    command: String,
    cwd: PathBuf,
    path: Option<String>,
}

/// Resolves command names through a [`PathSearch`], with caching.
#[derive(Debug)]
pub struct Resolver {
    platform: Platform,
    search: Arc<dyn PathSearch>,
    // `None` values record "not found" and are distinct from a miss.
    cache: Mutex<BoundedCache<ResolveKey, Option<PathBuf>>>,
}

impl Resolver {
    pub fn new(platform: Platform, search: Arc<dyn PathSearch>) -> Self {
        Self::with_capacity(platform, search, RESOLVE_CACHE_CAPACITY)
    }

    pub fn with_capacity(platform: Platform, search: Arc<dyn PathSearch>, capacity: usize) -> Self {
        Self {
            platform,
            search,
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    /// Resolve `command` as seen from `env`.
    ///
    /// Tries with the platform's extension rules first, then without them
    /// (for scripts named without an extension). Returns `None` when
    /// neither attempt finds a file; that outcome is cached too.
    pub fn resolve(&self, command: &str, env: &Environment) -> Option<PathBuf> {
        let path = env.path_value(self.platform);
        let key = ResolveKey {
            command: command.to_string(),
            cwd: env.cwd.clone(),
            path: path.map(str::to_string),
        };

        if let Some(hit) = self.lock_cache().get(&key) {
            debug!(command, resolved = ?hit, "resolve cache hit");
            return hit.clone();
        }

        let resolved = self
            .attempt(command, path, &env.cwd, ExtensionRule::Platform)
            .or_else(|| self.attempt(command, path, &env.cwd, ExtensionRule::Ignore));

        debug!(command, cwd = ?env.cwd, ?resolved, "resolved command");
        self.lock_cache().insert(key, resolved.clone());
        resolved
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    fn attempt(
        &self,
        command: &str,
        path: Option<&str>,
        cwd: &Path,
        extensions: ExtensionRule,
    ) -> Option<PathBuf> {
        let query = SearchQuery {
            path,
            cwd,
            extensions,
        };

        match self.search.search(command, &query) {
            // The search may hand back a path relative to `cwd`.
            Ok(found) => Some(clean_path(&cwd.join(found))),
            Err(err) => {
                debug!(command, ?extensions, error = %err, "search attempt failed");
                None
            }
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, BoundedCache<ResolveKey, Option<PathBuf>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
