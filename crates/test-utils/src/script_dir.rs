use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Temporary directory of scripts, removed on drop.
///
/// ```ignore
/// let dir = ScriptDir::new()?
///     .executable("hello", "#!/bin/sh\necho hello\n")?;
/// ```
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp script dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Value suitable for `PATH` containing only this directory.
    pub fn search_path(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Write a plain file (no executable bit).
    pub fn file(self, name: &str, contents: &str) -> Result<Self> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {:?}", path))?;
        Ok(self)
    }

    /// Write a file and mark it executable on unix.
    pub fn executable(self, name: &str, contents: &str) -> Result<Self> {
        let this = self.file(name, contents)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = this.join(name);
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms)?;
        }
        Ok(this)
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
