// tests/logging_filter.rs

use tracing_subscriber::filter::LevelFilter;
use xspawn::cli::LogLevel;
use xspawn::logging::{build_filter, parse_level_str};

#[test]
fn default_is_warn() {
    assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::WARN));
    assert_eq!(build_filter(None, Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn cli_level_scopes_to_crate_and_beats_env() {
    let filter = build_filter(Some(LogLevel::Debug), Some("trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    assert!(filter.to_string().contains("xspawn=debug"));

    // Other targets stay at warn, so a quieter crate level can't go below it.
    let filter = build_filter(Some(LogLevel::Error), None);
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn bare_env_level_scopes_to_crate() {
    let filter = build_filter(None, Some("Trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    assert!(filter.to_string().contains("xspawn=trace"));
}

#[test]
fn env_directives_pass_through() {
    let filter = build_filter(None, Some("which=info,error"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
}

#[test]
fn level_names_parse_leniently() {
    assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("debug"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("loud"), None);
}
