// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::validate::validate_options;
use crate::errors::Result;
use crate::types::SpawnOptions;

/// Read an options file and deserialize it.
///
/// Only TOML deserialization happens here; unknown keys are rejected by
/// serde. Use [`load_options`] to also run semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SpawnOptions> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let options: SpawnOptions = toml::from_str(&contents)?;

    Ok(options)
}

/// Read, deserialize and validate an options file.
///
/// A relative `cwd` in the file is taken relative to the file's own
/// directory, so option files can live next to the project they describe.
pub fn load_options(path: impl AsRef<Path>) -> Result<SpawnOptions> {
    let path = path.as_ref();
    let mut options = load_from_path(path)?;

    if let Some(cwd) = options.cwd.take() {
        let base = path.parent().filter(|p| !p.as_os_str().is_empty());
        options.cwd = Some(match base {
            Some(base) if cwd.is_relative() => base.join(cwd),
            _ => cwd,
        });
    }

    validate_options(&options)?;
    Ok(options)
}
