// tests/spawn_process.rs

mod common;
use crate::common::{init_tracing, posix_parser};

use std::path::PathBuf;

use xspawn::errors::SpawnError;
use xspawn::spawn::{build_command, verify_not_found};
use xspawn::types::{ParsedInvocation, Platform, Shell, SpawnOptions, SpawnRequest};
use xspawn_test_utils::fake_search::FakePathSearch;

fn parsed_for(request: &SpawnRequest) -> ParsedInvocation {
    posix_parser(&FakePathSearch::new()).parse(request)
}

#[test]
fn unresolved_exit_code_one_is_not_found_on_windows() {
    let parsed = parsed_for(&SpawnRequest::new("ghost").args(["x"]));

    let err = verify_not_found(Platform::Windows, Some(1), &parsed, "spawnSync")
        .expect("not found error");
    match err {
        SpawnError::NotFound { command, syscall } => {
            assert_eq!(command, "ghost");
            assert_eq!(syscall, "spawnSync");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn exit_code_one_is_trusted_when_resolved_or_on_posix() {
    let mut parsed = parsed_for(&SpawnRequest::new("tool"));

    assert!(verify_not_found(Platform::Posix, Some(1), &parsed, "spawn").is_none());
    assert!(verify_not_found(Platform::Windows, Some(0), &parsed, "spawn").is_none());
    assert!(verify_not_found(Platform::Windows, Some(2), &parsed, "spawn").is_none());

    parsed.file = Some(PathBuf::from("/bin/tool.exe"));
    assert!(verify_not_found(Platform::Windows, Some(1), &parsed, "spawn").is_none());
}

#[test]
fn not_found_error_mirrors_enoent_message() {
    let err = SpawnError::not_found("ghost", "spawn");
    assert_eq!(err.to_string(), "spawn ghost ENOENT");
    assert!(err.is_not_found());
}

#[test]
fn command_carries_cwd_and_replacement_env() {
    let options = SpawnOptions::default()
        .with_cwd("/srv/app")
        .with_env([("ONLY", "this")]);
    let parsed = parsed_for(&SpawnRequest::new("run").args(["--fast"]).options(options));

    let cmd = build_command(&parsed, Platform::Posix);

    assert_eq!(cmd.get_program(), "run");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["--fast"]);
    assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/srv/app")));
    let envs: Vec<_> = cmd.get_envs().collect();
    assert_eq!(envs, vec![(std::ffi::OsStr::new("ONLY"), Some(std::ffi::OsStr::new("this")))]);
}

#[test]
fn shell_option_wraps_command_line_for_posix_sh() {
    let options = SpawnOptions::default().with_shell(Shell::Enabled(true));
    let parsed = parsed_for(&SpawnRequest::new("echo").args(["$HOME", "|", "wc"]).options(options));

    let cmd = build_command(&parsed, Platform::Posix);

    assert_eq!(cmd.get_program(), "/bin/sh");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["-c", "echo $HOME | wc"]);
}

#[test]
fn shell_program_is_honoured() {
    let options = SpawnOptions::default().with_shell(Shell::Program("/bin/bash".to_string()));
    let parsed = parsed_for(&SpawnRequest::new("true").options(options));

    let cmd = build_command(&parsed, Platform::Posix);

    assert_eq!(cmd.get_program(), "/bin/bash");
}

#[test]
fn shell_option_on_windows_uses_comspec() {
    let options = SpawnOptions::default()
        .with_shell(Shell::Enabled(true))
        .with_env([("Path", r"C:\bin")]);
    let parsed = parsed_for(&SpawnRequest::new("dir").args(["/b"]).options(options));

    let cmd = build_command(&parsed, Platform::Windows);

    assert_eq!(cmd.get_program(), "cmd.exe");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["/d", "/s", "/c", "\"dir /b\""]);
}

#[cfg(unix)]
mod real_processes {
    use super::*;

    use xspawn::spawn::{spawn_sync_with, spawn_with};

    #[test]
    fn spawn_sync_collects_output() {
        init_tracing();
        let parser = posix_parser(&FakePathSearch::new());

        let output = spawn_sync_with(&parser, &SpawnRequest::new("echo").args(["hello"]))
            .expect("echo runs");

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
    }

    #[test]
    fn spawned_child_reports_exit_code() {
        let parser = posix_parser(&FakePathSearch::new());

        let mut child = spawn_with(&parser, &SpawnRequest::new("sh").args(["-c", "exit 3"]))
            .expect("sh starts");
        assert_eq!(child.parsed().original.command, "sh");

        let status = child.wait().expect("wait succeeds");
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn running_child_can_be_killed() {
        let parser = posix_parser(&FakePathSearch::new());

        let mut child = spawn_with(&parser, &SpawnRequest::new("sleep").args(["30"]))
            .expect("sleep starts");
        assert!(child.id() > 0);

        child.child_mut().kill().expect("kill succeeds");
        let status = child.wait().expect("wait succeeds");
        assert!(!status.success());
    }

    #[test]
    fn shell_request_expands_variables() {
        let parser = posix_parser(&FakePathSearch::new());
        let path = std::env::var("PATH").unwrap_or_default();
        let options = SpawnOptions::default()
            .with_shell(Shell::Enabled(true))
            .with_env([("XSPAWN_GREETING", "hi"), ("PATH", path.as_str())]);

        let output = spawn_sync_with(
            &parser,
            &SpawnRequest::new("echo $XSPAWN_GREETING").options(options),
        )
        .expect("shell runs");

        assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
    }

    #[test]
    fn missing_command_is_not_found() {
        let parser = posix_parser(&FakePathSearch::new());

        let err = spawn_sync_with(&parser, &SpawnRequest::new("xspawn-no-such-command"))
            .expect_err("command does not exist");

        match err {
            SpawnError::NotFound { command, syscall } => {
                assert_eq!(command, "xspawn-no-such-command");
                assert_eq!(syscall, "spawnSync");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn cwd_option_sets_child_directory() {
        let dir = tempfile::tempdir().unwrap();
        let parser = posix_parser(&FakePathSearch::new());
        let options = SpawnOptions::default().with_cwd(dir.path());

        let output = spawn_sync_with(&parser, &SpawnRequest::new("pwd").options(options))
            .expect("pwd runs");

        let printed = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        assert_eq!(
            printed.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
