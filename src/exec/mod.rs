//! Command execution
//!
//! Runs a command to completion with its stdout and stderr buffered in
//! memory, then decides from the exit code and stdout whether the output is
//! muted or written to the caller's sinks.
//!
//! # Exit codes
//!
//! A command that exits normally reports its own exit status. A command that
//! cannot be started, is killed by a signal, or cannot be waited on reports
//! [`EXIT_EXEC_FAILURE`](crate::EXIT_EXEC_FAILURE). Muting never changes the
//! reported exit code.
//!
//! # Signals
//!
//! SIGINT and SIGTERM received while a command runs are forwarded to it. See
//! [`signals`].

mod result;
mod runner;
pub mod signals;
mod target;

pub use result::{RunError, RunResult, Termination};
pub use runner::run_command;
pub use target::{execute, ExecOutcome, Target};
