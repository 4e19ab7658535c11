//! Tests for config files driving execution through the library

use super::helpers::fixture;
use mute::{resolve_criteria, Config, ConfigError, Criteria, Criterion, Target};

fn criteria(codes: &[i32], patterns: &[&str]) -> Criteria {
    Criteria::new().with(Criterion::new(codes, patterns).unwrap())
}

#[test]
fn test_simple_fixture() {
    let config = Config::from_file(fixture("simple.toml")).unwrap();
    let want = Criteria::new()
        .with(Criterion::new(&[0], &[]).unwrap())
        .with(Criterion::new(&[1, 2], &["OK"]).unwrap());
    assert_eq!(config.default, want);
    assert!(config.commands.is_empty());
}

#[test]
fn test_commands_fixture_resolution() {
    let config = Config::from_file(fixture("commands.toml")).unwrap();
    assert_eq!(config.default, criteria(&[0], &[]));

    assert_eq!(
        *resolve_criteria("/bin/sh", &config),
        criteria(&[1, 2], &["OK"])
    );
    assert_eq!(*resolve_criteria("/bin/sed", &config), criteria(&[3], &[]));
    assert_eq!(*resolve_criteria("/usr/bin/env", &config), config.default);
}

#[test]
fn test_invalid_pattern_fixture() {
    let err = Config::from_file(fixture("invalid_pattern.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("invalid_pattern.toml"));
}

#[test]
fn test_command_override_mutes_despite_default() {
    let config = Config::from_file(fixture("commands.toml")).unwrap();
    let mut out = Vec::new();
    let mut err = Vec::new();

    let outcome = Target::new("/bin/sh")
        .args(["-c", "echo OK; exit 1"])
        .execute(&config, &mut out, &mut err);

    assert_eq!(outcome.exit_code, 1);
    assert!(outcome.muted);
    assert!(out.is_empty());
    assert!(err.is_empty());
}

#[test]
fn test_buffer_capacity_does_not_limit_output() {
    let mut out = Vec::new();
    let mut err = Vec::new();

    let outcome = Target::new("sh")
        .args(["-c", "printf '%s' 0123456789abcdef; exit 5"])
        .buffer_capacity(4)
        .execute(&Config::mute_successful(), &mut out, &mut err);

    assert_eq!(outcome.exit_code, 5);
    assert_eq!(out, b"0123456789abcdef");
}
