//! Test helper functions for E2E tests

use std::path::PathBuf;
use std::process::{Command, Output};

use mute::config::{ENV_CONFIG, ENV_EXIT_CODES, ENV_STDOUT_PATTERN};

/// Path to a file under tests/fixtures
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command for the mute binary with a clean mute environment
///
/// `MUTE_CONFIG` is set to `config` so the system config file is never read.
pub fn mute_command(config: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mute"));
    cmd.env(ENV_CONFIG, config)
        .env_remove(ENV_EXIT_CODES)
        .env_remove(ENV_STDOUT_PATTERN)
        .env_remove("MUTE_LOG");
    cmd
}

/// Run the mute binary on `sh -c script`
pub fn mute_sh(config: &str, script: &str) -> Output {
    mute_command(config)
        .args(["sh", "-c", script])
        .output()
        .expect("Failed to run mute binary")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
