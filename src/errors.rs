// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpawnError {
    /// The command could not be located (mirrors the OS `ENOENT` shape).
    #[error("{syscall} {command} ENOENT")]
    NotFound { command: String, syscall: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpawnError {
    pub fn not_found(command: impl Into<String>, syscall: impl Into<String>) -> Self {
        SpawnError::NotFound {
            command: command.into(),
            syscall: syscall.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SpawnError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SpawnError>;
