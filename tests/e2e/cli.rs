//! Tests for the mute command line

use super::helpers::{fixture, mute_command, mute_sh, stderr_of, stdout_of};
use mute::config::{ENV_EXIT_CODES, ENV_STDOUT_PATTERN};
use mute::{EXIT_CONFIG_ERROR, EXIT_EXEC_FAILURE};

#[test]
fn test_mutes_successful_command_by_default() {
    let output = mute_sh("", "echo hello; echo warning >&2");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "");
    assert_eq!(stderr_of(&output), "");
}

#[test]
fn test_failed_command_output_is_forwarded() {
    let output = mute_sh("", "echo out; echo err >&2; exit 4");
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stdout_of(&output), "out\n");
    assert_eq!(stderr_of(&output), "err\n");
}

#[test]
fn test_arguments_are_passed_through() {
    let output = mute_command("")
        .args(["sh", "-c", "echo \"$@\"; exit 1", "sh", "--help", "-x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "--help -x\n");
}

#[test]
fn test_non_utf8_arguments_and_output_pass_through() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let output = mute_command("")
        .args(["sh", "-c", "printf '%s' \"$1\"; printf '\\351' >&2; exit 1", "sh"])
        .arg(OsStr::from_bytes(b"caf\xe9"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"caf\xe9");
    assert_eq!(output.stderr, b"\xe9");
}

#[test]
fn test_missing_command_exits_with_exec_failure() {
    let output = mute_command("").output().unwrap();
    assert_eq!(output.status.code(), Some(EXIT_EXEC_FAILURE));
    assert!(stderr_of(&output).contains("Usage"));
}

#[test]
fn test_version_flag() {
    let output = mute_command("").arg("--version").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains(mute::VERSION));
}

#[test]
fn test_nonexistent_command() {
    let output = mute_command("")
        .arg("/nonexistent/definitely-not-a-command")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(EXIT_EXEC_FAILURE));
    assert!(stderr_of(&output).contains("failed to start"));
}

#[test]
fn test_env_overrides() {
    let output = mute_command("")
        .env(ENV_EXIT_CODES, "1,2")
        .env(ENV_STDOUT_PATTERN, "^OK")
        .args(["sh", "-c", "echo OK; exit 2"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_of(&output), "");

    // The override replaces the built-in default, so success is not muted
    let output = mute_command("")
        .env(ENV_EXIT_CODES, "1,2")
        .args(["sh", "-c", "echo hi"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "hi\n");
}

#[test]
fn test_invalid_env_override_is_config_error() {
    let output = mute_command("")
        .env(ENV_EXIT_CODES, "4,z")
        .args(["sh", "-c", "echo hi"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
    assert!(stderr_of(&output).contains("config error"));
    assert_eq!(stdout_of(&output), "");
}

#[test]
fn test_missing_config_file_falls_back_to_default() {
    let output = mute_sh("/nonexistent/mute.toml", "echo hello");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "");
}

#[test]
fn test_invalid_config_file_is_config_error() {
    let config = fixture("invalid_pattern.toml");
    let output = mute_sh(config.to_str().unwrap(), "echo hello");
    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
}

#[test]
fn test_config_file_patterns() {
    let config = fixture("simple.toml");
    let config = config.to_str().unwrap();

    let output = mute_sh(config, "echo 'OK done'; exit 1");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "");

    let output = mute_sh(config, "echo fail; echo why >&2; exit 1");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "fail\n");
    assert_eq!(stderr_of(&output), "why\n");
}
