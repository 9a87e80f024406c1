// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// Only what resolution and shebang sniffing need: checking that a
/// candidate is a regular file, and reading the head of one.
pub trait FileSystem: Send + Sync + Debug {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn is_file(&self, path: &Path) -> bool;

    /// Read at most `limit` bytes from the start of `path`.
    fn read_prefix(&self, path: &Path, limit: usize) -> Result<Vec<u8>> {
        let reader = self.open_read(path)?;
        let mut buf = Vec::with_capacity(limit);
        reader
            .take(limit as u64)
            .read_to_end(&mut buf)
            .with_context(|| format!("reading head of {:?}", path))?;
        Ok(buf)
    }
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
