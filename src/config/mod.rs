// src/config/mod.rs

//! Spawn options from TOML files.
//!
//! - Load an options file from disk (`loader.rs`).
//! - Validate what serde can't check (`validate.rs`).

pub mod loader;
pub mod validate;

pub use loader::{load_from_path, load_options};
pub use validate::validate_options;
