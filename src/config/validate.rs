// src/config/validate.rs

use crate::errors::{Result, SpawnError};
use crate::types::{Shell, SpawnOptions};

/// Check the invariants serde can't express.
pub fn validate_options(options: &SpawnOptions) -> Result<()> {
    validate_cwd(options)?;
    validate_env(options)?;
    validate_shell(options)?;
    Ok(())
}

fn validate_cwd(options: &SpawnOptions) -> Result<()> {
    if let Some(ref cwd) = options.cwd {
        if !cwd.is_dir() {
            return Err(SpawnError::ConfigError(format!(
                "cwd {:?} is not an existing directory",
                cwd
            )));
        }
    }
    Ok(())
}

fn validate_env(options: &SpawnOptions) -> Result<()> {
    let Some(ref vars) = options.env else {
        return Ok(());
    };

    for name in vars.keys() {
        if name.is_empty() || name.contains('=') || name.contains('\0') {
            return Err(SpawnError::ConfigError(format!(
                "invalid environment variable name {name:?}"
            )));
        }
    }
    Ok(())
}

fn validate_shell(options: &SpawnOptions) -> Result<()> {
    if let Shell::Program(ref program) = options.shell {
        if program.trim().is_empty() && !program.is_empty() {
            return Err(SpawnError::ConfigError(
                "shell program must not be blank".to_string(),
            ));
        }
    }
    Ok(())
}
