//! Result types for command execution

use std::io;
use thiserror::Error;

use crate::EXIT_EXEC_FAILURE;

/// How a child process ended
#[derive(Debug)]
pub enum Termination {
    /// The process exited normally with this status
    Exited(i32),
    /// The process could not be started
    FailedToStart(io::Error),
    /// The process was killed by this signal
    KilledBySignal(i32),
    /// Waiting for the process failed, its status is unknown
    WaitFailed(io::Error),
}

impl Termination {
    /// Exit code reported for this termination
    ///
    /// Normal exits report their own status; anything else reports
    /// [`EXIT_EXEC_FAILURE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Exited(code) => *code,
            Termination::FailedToStart(_)
            | Termination::KilledBySignal(_)
            | Termination::WaitFailed(_) => EXIT_EXEC_FAILURE,
        }
    }
}

/// Errors from running a command
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' was terminated by signal {signal}")]
    Signaled { command: String, signal: i32 },

    #[error("failed to wait for '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' exited with status {code}")]
    ExitStatus { command: String, code: i32 },
}

/// Outcome of a single run with its captured output
#[derive(Debug)]
pub struct RunResult {
    pub command: String,
    pub termination: Termination,
    /// Captured stdout, byte for byte
    pub stdout: Vec<u8>,
    /// Captured stderr, byte for byte
    pub stderr: Vec<u8>,
}

impl RunResult {
    pub fn new(command: String, termination: Termination, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            command,
            termination,
            stdout,
            stderr,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.termination.exit_code()
    }

    /// Check if the process never started
    pub fn failed_to_start(&self) -> bool {
        matches!(self.termination, Termination::FailedToStart(_))
    }

    /// Error describing an unsuccessful run, `None` for exit status zero
    pub fn into_error(self) -> Option<RunError> {
        let command = self.command;
        match self.termination {
            Termination::Exited(0) => None,
            Termination::Exited(code) => Some(RunError::ExitStatus { command, code }),
            Termination::FailedToStart(source) => Some(RunError::Spawn { command, source }),
            Termination::KilledBySignal(signal) => Some(RunError::Signaled { command, signal }),
            Termination::WaitFailed(source) => Some(RunError::Wait { command, source }),
        }
    }
}
