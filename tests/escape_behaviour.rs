// tests/escape_behaviour.rs

mod common;
use crate::common::{cmd_unescape, init_tracing, split_msvcrt};

use std::time::{Duration, Instant};

use xspawn::escape::{escape_argument, escape_command, quote_argument, Escaper, META_CHARS};

#[test]
fn command_escapes_every_metachar_with_caret() {
    assert_eq!(escape_command("plain.exe"), "plain.exe");
    assert_eq!(escape_command("foo bar"), "foo^ bar");
    assert_eq!(escape_command("a&b|c>d"), "a^&b^|c^>d");
    assert_eq!(escape_command("%PATH%"), "^%PATH^%");

    for &meta in META_CHARS {
        let raw = meta.to_string();
        assert_eq!(escape_command(&raw), format!("^{meta}"), "metachar {meta:?}");
    }
}

#[test]
fn argument_is_quoted_then_caret_escaped() {
    assert_eq!(escape_argument("hello", false), "^\"hello^\"");
    assert_eq!(escape_argument("", false), "^\"^\"");
    assert_eq!(escape_argument("a b", false), "^\"a^ b^\"");
}

#[test]
fn backslashes_before_quote_are_doubled() {
    // a\"b  ->  "a\\\"b"
    assert_eq!(quote_argument(r#"a\"b"#), r#""a\\\"b""#);
    // a"b  ->  "a\"b"
    assert_eq!(quote_argument(r#"a"b"#), r#""a\"b""#);
    // three backslashes then a quote: 2*3 + 1 backslashes
    assert_eq!(quote_argument(r#"\\\""#), r#""\\\\\\\"""#);
}

#[test]
fn trailing_backslashes_are_doubled() {
    assert_eq!(quote_argument(r"C:\dir\"), r#""C:\dir\\""#);
    assert_eq!(quote_argument(r"x\\"), r#""x\\\\""#);
}

#[test]
fn inner_backslashes_stay_literal() {
    assert_eq!(quote_argument(r"C:\Program Files\x"), r#""C:\Program Files\x""#);
}

#[test]
fn double_escape_applies_carets_twice() {
    assert_eq!(escape_argument("a b", true), "^^^\"a^^^ b^^^\"");

    let raw = "x&y";
    let once = escape_argument(raw, false);
    let twice = escape_argument(raw, true);
    assert_eq!(cmd_unescape(&twice), once);
}

#[test]
fn argument_survives_cmd_and_argv_parsing() {
    let cases = [
        "",
        "simple",
        "with space",
        r#"has "quotes" inside"#,
        r"trailing\",
        r#"\\server\share\"#,
        "%PATH% & del *.* | more",
        "^caret^",
        r#"\"\\"\\\""#,
    ];

    for raw in cases {
        let escaped = escape_argument(raw, false);
        let argv = split_msvcrt(&cmd_unescape(&escaped));
        assert_eq!(argv, vec![raw.to_string()], "escaped form {escaped:?}");
    }
}

#[test]
fn long_backslash_run_escapes_in_linear_time() {
    init_tracing();

    let mut raw = "\\".repeat(50_000);
    raw.push('"');

    let start = Instant::now();
    let escaped = escape_argument(&raw, false);
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "escaping took {:?}",
        start.elapsed()
    );

    // ^" + 100_001 backslashes + ^" + closing ^"
    assert!(escaped.starts_with("^\"\\"));
    assert!(escaped.ends_with("\\^\"^\""));
    assert_eq!(escaped.chars().filter(|c| *c == '\\').count(), 100_001);

    let argv = split_msvcrt(&cmd_unescape(&escaped));
    assert_eq!(argv, vec![raw]);
}

#[test]
fn pathological_trailing_run_does_not_hang() {
    let raw = format!("{}x{}", "\\".repeat(20_000), "\\".repeat(20_000));

    let start = Instant::now();
    let escaped = escape_argument(&raw, true);
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(escaped.chars().filter(|c| *c == '\\').count(), 60_000);
}

#[test]
fn escaper_caches_by_input_and_mode() {
    let escaper = Escaper::new();

    let first = escaper.argument("a b", false);
    let again = escaper.argument("a b", false);
    assert_eq!(first, again);
    assert_eq!(escaper.cached_entries(), 1);

    let double = escaper.argument("a b", true);
    assert_ne!(first, double);
    let command = escaper.command("a b");
    assert_eq!(command, "a^ b");
    assert_eq!(escaper.cached_entries(), 3);
}

#[test]
fn escaper_cache_is_bounded() {
    let escaper = Escaper::with_capacity(2);
    for raw in ["one", "two", "three", "four"] {
        escaper.command(raw);
    }
    assert_eq!(escaper.cached_entries(), 2);
    assert_eq!(escaper.command("one"), "one");
}
