//! Relaying SIGINT and SIGTERM to running children
//!
//! While a run is in progress the parent intercepts SIGINT and SIGTERM and
//! forwards them to the child instead of dying with it unreported. Handler
//! installation is reference counted across concurrent runs: the first
//! [`SignalRelay`] installs the handlers and the last one dropped restores
//! the previous dispositions.
//!
//! The handler only touches atomics and calls `kill(2)`, both async-signal-safe.
//! Anything worth reporting is recorded in the run's slot and logged when the
//! relay is dropped.

use nix::errno::Errno;
use nix::sys::signal::{kill, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, PoisonError};

/// Signals forwarded to the child
pub const RELAYED_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGTERM];

/// Maximum number of concurrent runs that get signals relayed
const MAX_RELAYED_CHILDREN: usize = 64;

const UNCLAIMED: i32 = 0;
/// Slot claimed by a run whose child has not started yet
const PENDING: i32 = -1;
/// Slot claimed by a run whose child has exited
const FINISHED: i32 = -2;
const NONE: i32 = 0;

/// Per-run state shared with the signal handler
struct Slot {
    pid: AtomicI32,
    /// Last signal that arrived before the child started
    dropped: AtomicI32,
    /// Errno of the last failed forward
    failed: AtomicI32,
}

impl Slot {
    const fn new() -> Self {
        Self {
            pid: AtomicI32::new(UNCLAIMED),
            dropped: AtomicI32::new(NONE),
            failed: AtomicI32::new(NONE),
        }
    }
}

static SLOTS: [Slot; MAX_RELAYED_CHILDREN] = [const { Slot::new() }; MAX_RELAYED_CHILDREN];

struct Handlers {
    active: usize,
    previous: Vec<(Signal, SigAction)>,
}

static HANDLERS: Mutex<Handlers> = Mutex::new(Handlers {
    active: 0,
    previous: Vec::new(),
});

extern "C" fn on_signal(signum: libc::c_int) {
    relay_to_children(signum);
}

fn relay_to_children(signum: libc::c_int) {
    let Ok(signal) = Signal::try_from(signum) else {
        return;
    };
    for slot in SLOTS.iter() {
        match slot.pid.load(Ordering::SeqCst) {
            UNCLAIMED | FINISHED => {}
            PENDING => slot.dropped.store(signum, Ordering::SeqCst),
            pid => {
                if let Err(errno) = kill(Pid::from_raw(pid), signal) {
                    slot.failed.store(errno as i32, Ordering::SeqCst);
                }
            }
        }
    }
}

fn install_handlers() {
    let mut handlers = HANDLERS.lock().unwrap_or_else(PoisonError::into_inner);
    handlers.active += 1;
    if handlers.active > 1 {
        return;
    }

    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in RELAYED_SIGNALS {
        // SAFETY: on_signal only performs atomic loads/stores and kill(2)
        match unsafe { sigaction(signal, &action) } {
            Ok(previous) => handlers.previous.push((signal, previous)),
            Err(e) => tracing::warn!(%signal, error = %e, "failed to install signal handler"),
        }
    }
}

fn uninstall_handlers() {
    let mut handlers = HANDLERS.lock().unwrap_or_else(PoisonError::into_inner);
    handlers.active = handlers.active.saturating_sub(1);
    if handlers.active > 0 {
        return;
    }

    for (signal, previous) in handlers.previous.drain(..) {
        // SAFETY: restores the disposition that was in place before install_handlers
        if let Err(e) = unsafe { sigaction(signal, &previous) } {
            tracing::warn!(%signal, error = %e, "failed to restore signal handler");
        }
    }
}

fn claim_slot() -> Option<usize> {
    SLOTS.iter().position(|slot| {
        slot.pid
            .compare_exchange(UNCLAIMED, PENDING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    })
}

/// Forwards SIGINT and SIGTERM to one child for as long as it is alive
///
/// Create the relay before spawning the child and [`attach`](Self::attach)
/// the child's pid once it exists. Signals arriving in between are not
/// forwarded and get reported when the relay is dropped.
pub struct SignalRelay {
    slot: Option<usize>,
    pid: Option<i32>,
}

impl SignalRelay {
    pub fn install() -> Self {
        let slot = claim_slot();
        if slot.is_none() {
            tracing::warn!(
                "more than {MAX_RELAYED_CHILDREN} concurrent runs, signals will not be relayed"
            );
            return Self { slot, pid: None };
        }
        install_handlers();
        Self { slot, pid: None }
    }

    /// Start forwarding signals to the process `pid`
    pub fn attach(&mut self, pid: u32) {
        let Some(index) = self.slot else {
            return;
        };
        let Ok(pid) = i32::try_from(pid) else {
            tracing::warn!(pid, "pid out of range, signals will not be relayed");
            return;
        };
        self.pid = Some(pid);
        SLOTS[index].pid.store(pid, Ordering::SeqCst);
    }

    /// Whether signals are currently forwarded to a child
    pub fn is_attached(&self) -> bool {
        self.slot
            .is_some_and(|index| SLOTS[index].pid.load(Ordering::SeqCst) > 0)
    }

    /// Stop forwarding signals to the attached process
    ///
    /// Call after the child has exited but before it is reaped, while its pid
    /// cannot belong to another process.
    pub fn detach(&mut self) {
        if let Some(index) = self.slot {
            SLOTS[index].pid.store(FINISHED, Ordering::SeqCst);
        }
    }

    fn report(&self, slot: &Slot) {
        let dropped = slot.dropped.swap(NONE, Ordering::SeqCst);
        if dropped != NONE {
            let signal = Signal::try_from(dropped)
                .map(|s| s.as_str())
                .unwrap_or("unknown");
            tracing::warn!(signal, "signal arrived before the child started, not relayed");
        }

        let failed = slot.failed.swap(NONE, Ordering::SeqCst);
        if failed != NONE {
            tracing::warn!(
                pid = ?self.pid,
                error = %Errno::from_raw(failed),
                "failed to relay signal to child"
            );
        }
    }
}

impl Drop for SignalRelay {
    fn drop(&mut self) {
        let Some(index) = self.slot else {
            return;
        };
        let slot = &SLOTS[index];
        slot.pid.store(FINISHED, Ordering::SeqCst);
        uninstall_handlers();
        self.report(slot);
        slot.pid.store(UNCLAIMED, Ordering::SeqCst);
    }
}
