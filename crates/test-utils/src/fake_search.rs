use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use xspawn::errors::{Result, SpawnError};
use xspawn::resolve::{ExtensionRule, PathSearch, SearchQuery};

/// One lookup observed by [`FakePathSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub name: String,
    pub path: Option<String>,
    pub cwd: PathBuf,
    pub extensions: ExtensionRule,
}

/// A fake path search that:
/// - answers from a fixed table instead of touching the filesystem
/// - records every query so tests can assert on cwd / path / retries.
#[derive(Debug, Clone, Default)]
pub struct FakePathSearch {
    with_ext: Arc<Mutex<HashMap<String, PathBuf>>>,
    without_ext: Arc<Mutex<HashMap<String, PathBuf>>>,
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

impl FakePathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` resolves to `path` under either extension rule.
    pub fn found(self, name: &str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_ext
            .lock()
            .unwrap()
            .insert(name.to_string(), path.clone());
        self.without_ext
            .lock()
            .unwrap()
            .insert(name.to_string(), path);
        self
    }

    /// `name` resolves only once extension rules are dropped (e.g. a script
    /// without `.exe`/`.cmd`).
    pub fn found_without_extension(self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.without_ext
            .lock()
            .unwrap()
            .insert(name.to_string(), path.into());
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name == name)
            .count()
    }
}

impl PathSearch for FakePathSearch {
    fn search(&self, name: &str, query: &SearchQuery<'_>) -> Result<PathBuf> {
        self.calls.lock().unwrap().push(SearchCall {
            name: name.to_string(),
            path: query.path.map(str::to_string),
            cwd: query.cwd.to_path_buf(),
            extensions: query.extensions,
        });

        let table = match query.extensions {
            ExtensionRule::Platform => &self.with_ext,
            ExtensionRule::Ignore => &self.without_ext,
        };

        table
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| SpawnError::not_found(name, "which"))
    }
}
