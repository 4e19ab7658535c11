//! Low-level command execution with fully buffered output

use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use super::result::{RunResult, Termination};
use super::signals::SignalRelay;

/// Run `command` with `args`, capturing stdout and stderr in memory
///
/// Nothing is streamed to the caller while the child runs. SIGINT and SIGTERM
/// received by this process in the meantime are forwarded to the child.
/// `buffer_capacity` pre-allocates each output buffer; it is a hint, not a limit.
/// Output is kept as raw bytes, whatever its encoding.
pub fn run_command(command: &OsStr, args: &[OsString], buffer_capacity: usize) -> RunResult {
    let name = command.to_string_lossy().into_owned();
    let mut relay = SignalRelay::install();

    tracing::debug!(command = %name, ?args, "spawning command");
    let spawned = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(command = %name, error = %e, "failed to spawn command");
            return RunResult::new(
                name,
                Termination::FailedToStart(e),
                Vec::new(),
                Vec::new(),
            );
        }
    };
    relay.attach(child.id());

    // Drain both pipes while waiting, a full pipe would block the child forever
    let stdout_reader = child
        .stdout
        .take()
        .map(|stream| spawn_reader(stream, buffer_capacity));
    let stderr_reader = child
        .stderr
        .take()
        .map(|stream| spawn_reader(stream, buffer_capacity));

    let termination = match wait_and_detach(&mut child, &mut relay) {
        Ok(status) => classify(status),
        Err(e) => {
            // Reap it anyway so the reader threads see EOF
            let _ = child.kill();
            let _ = child.wait();
            Termination::WaitFailed(e)
        }
    };
    drop(relay);

    let stdout = collect_output(stdout_reader);
    let stderr = collect_output(stderr_reader);

    tracing::debug!(
        command = %name,
        ?termination,
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "command finished"
    );
    RunResult::new(name, termination, stdout, stderr)
}

/// Wait for `child`, detaching `relay` while its pid still belongs to the child
///
/// The child is left a zombie until the relay is detached, so a relayed
/// signal can never reach a process that reused the pid.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn wait_and_detach(child: &mut Child, relay: &mut SignalRelay) -> io::Result<ExitStatus> {
    wait_for_exit(child.id());
    relay.detach();
    child.wait()
}

/// Without a non-reaping wait the relay is detached right after the reap,
/// a signal landing in between may be sent to a reused pid.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn wait_and_detach(child: &mut Child, relay: &mut SignalRelay) -> io::Result<ExitStatus> {
    let status = child.wait();
    relay.detach();
    status
}

/// Block until the process `pid` has exited, without reaping it
#[cfg(any(target_os = "linux", target_os = "android"))]
fn wait_for_exit(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::wait::{waitid, Id, WaitPidFlag};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    loop {
        match waitid(
            Id::Pid(Pid::from_raw(raw)),
            WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT,
        ) {
            Ok(_) => return,
            Err(Errno::EINTR) => continue,
            Err(e) => {
                // Child::wait reports the failure
                tracing::debug!(pid, error = %e, "non-reaping wait failed");
                return;
            }
        }
    }
}

/// Map an exit status to a termination
fn classify(status: ExitStatus) -> Termination {
    match status.code() {
        Some(code) => Termination::Exited(code),
        None => Termination::KilledBySignal(status.signal().unwrap_or_default()),
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    mut stream: R,
    capacity: usize,
) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::with_capacity(capacity);
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect_output(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Vec<u8> {
    let Some(handle) = reader else {
        return Vec::new();
    };
    match handle.join() {
        Ok(Ok(buf)) => buf,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to read command output");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!("output reader thread panicked");
            Vec::new()
        }
    }
}
