//! Run a command and decide whether to mute its output

use std::ffi::{OsStr, OsString};
use std::io::Write;

use super::result::RunError;
use super::runner::run_command;
use crate::config::{resolve_criteria, Config};

/// What to execute
#[derive(Debug, Clone)]
pub struct Target {
    pub command: OsString,
    pub args: Vec<OsString>,
    /// Initial capacity in bytes of each output buffer
    pub buffer_capacity: usize,
}

/// Result of [`Target::execute`]
#[derive(Debug)]
pub struct ExecOutcome {
    /// Exit code of the command, never altered by muting
    pub exit_code: i32,
    /// Whether the output was suppressed
    pub muted: bool,
    pub error: Option<RunError>,
}

impl Target {
    pub fn new(command: impl Into<OsString>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            buffer_capacity: 0,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes;
        self
    }

    /// Run the command and write its output unless the run matches the config
    ///
    /// The captured stdout goes to `out` and stderr to `err`, both verbatim and
    /// only after the command has exited. When the applicable criteria match,
    /// nothing is written. A command that cannot be started is never muted;
    /// its error is written to `err` instead.
    ///
    /// # Panics
    ///
    /// Panics if the command is empty.
    pub fn execute<O, E>(&self, config: &Config, out: &mut O, err: &mut E) -> ExecOutcome
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        assert!(!self.command.is_empty(), "target command is empty");

        let result = run_command(&self.command, &self.args, self.buffer_capacity);
        let exit_code = result.exit_code();

        if result.failed_to_start() {
            let error = result.into_error();
            if let Some(e) = &error {
                write_sink(err, format!("mute: {e}\n").as_bytes(), "stderr");
            }
            return ExecOutcome {
                exit_code,
                muted: false,
                error,
            };
        }

        // Patterns see invalid UTF-8 as U+FFFD, the sinks get the raw bytes
        let criteria = resolve_criteria(&result.command, config);
        let muted = criteria.matches_run(exit_code, &String::from_utf8_lossy(&result.stdout));
        if muted {
            tracing::debug!(command = %result.command, exit_code, "output muted");
        } else {
            write_sink(out, &result.stdout, "stdout");
            write_sink(err, &result.stderr, "stderr");
        }

        ExecOutcome {
            exit_code,
            muted,
            error: result.into_error(),
        }
    }
}

/// Run `command` with `args` against `config`, writing unmuted output to the sinks
///
/// See [`Target::execute`].
pub fn execute<O, E, S>(
    command: impl AsRef<OsStr>,
    args: &[S],
    config: &Config,
    out: &mut O,
    err: &mut E,
) -> ExecOutcome
where
    O: Write + ?Sized,
    E: Write + ?Sized,
    S: AsRef<OsStr>,
{
    Target::new(command.as_ref())
        .args(args.iter().map(|arg| arg.as_ref()))
        .execute(config, out, err)
}

fn write_sink<W: Write + ?Sized>(sink: &mut W, bytes: &[u8], name: &str) {
    if bytes.is_empty() {
        return;
    }
    if let Err(e) = sink.write_all(bytes).and_then(|()| sink.flush()) {
        tracing::warn!(sink = name, error = %e, "failed to write command output");
    }
}
