//! Per-run state of a scan.
//!
//! A [`ScanRun`] is created by the caller, executed once by a
//! [`Scanner`](super::Scanner) and handed back in a terminal state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use netsweep_common::network::{ports::PortRange, range::AddressSpace, target::Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Open targets in completion order. Inserting a target twice is a no-op.
#[derive(Debug, Default)]
pub(crate) struct OpenPorts {
    inner: Mutex<OpenPortsInner>,
}

#[derive(Debug, Default)]
struct OpenPortsInner {
    order: Vec<Target>,
    seen: HashSet<Target>,
}

impl OpenPorts {
    /// Returns `true` if `target` was not recorded before.
    pub(crate) fn insert(&self, target: Target) -> bool {
        let mut inner = self.lock();
        if !inner.seen.insert(target) {
            return false;
        }
        inner.order.push(target);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<Target> {
        self.lock().order.clone()
    }

    fn lock(&self) -> MutexGuard<'_, OpenPortsInner> {
        // Every mutation is a single push after a set insert, a poisoned lock
        // still holds a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// State shared between the scheduler and its probe workers.
#[derive(Debug, Default)]
pub(crate) struct RunShared {
    pub(crate) open: OpenPorts,
    pub(crate) dispatched: AtomicU64,
    pub(crate) completed: AtomicU64,
}

#[derive(Debug)]
pub struct ScanRun {
    network: AddressSpace,
    ports: PortRange,
    state: RunState,
    shared: Arc<RunShared>,
}

impl ScanRun {
    pub fn new(network: AddressSpace, ports: PortRange) -> Self {
        Self {
            network,
            ports,
            state: RunState::Idle,
            shared: Arc::default(),
        }
    }

    pub fn network(&self) -> &AddressSpace {
        &self.network
    }

    pub fn ports(&self) -> &PortRange {
        &self.ports
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of probes a complete run dispatches.
    pub fn total(&self) -> u64 {
        self.network.len() * self.ports.len() as u64
    }

    pub fn dispatched(&self) -> u64 {
        self.shared.dispatched.load(Ordering::Acquire)
    }

    pub fn completed(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RunState::Completed | RunState::Cancelled)
    }

    /// Open targets in the order their probes completed.
    pub fn open_ports(&self) -> Vec<Target> {
        self.shared.open.snapshot()
    }

    pub fn progress(&self) -> ScanProgress {
        ScanProgress {
            total: self.total(),
            shared: Arc::clone(&self.shared),
        }
    }

    pub(crate) fn set_state(&mut self, state: RunState) {
        self.state = state;
    }

    pub(crate) fn shared(&self) -> Arc<RunShared> {
        Arc::clone(&self.shared)
    }
}

/// Read-only view of a run's counters, usable from any thread while the run executes.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    total: u64,
    shared: Arc<RunShared>,
}

impl ScanProgress {
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn dispatched(&self) -> u64 {
        self.shared.dispatched.load(Ordering::Acquire)
    }

    pub fn completed(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }

    pub fn open(&self) -> usize {
        self.shared.open.len()
    }
}

/// Cooperative cancellation flag. Cancelling stops further dispatch; probes
/// already in flight are allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::thread;

    #[test]
    fn duplicate_inserts_are_ignored() {
        let open = OpenPorts::default();
        let target = Target::new(Ipv4Addr::new(10, 0, 0, 1), 22);
        assert!(open.insert(target));
        assert!(!open.insert(target));
        assert_eq!(open.snapshot(), [target]);
    }

    #[test]
    fn racing_inserts_keep_one_copy_per_target() {
        let open = Arc::new(OpenPorts::default());
        let targets: Vec<Target> = (1..=200)
            .map(|port| Target::new(Ipv4Addr::new(10, 0, 0, 1), port))
            .collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let open = Arc::clone(&open);
                let targets = targets.clone();
                thread::spawn(move || targets.into_iter().filter(|t| open.insert(*t)).count())
            })
            .collect();

        let fresh: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(fresh, targets.len());

        let mut recorded = open.snapshot();
        recorded.sort();
        assert_eq!(recorded, targets);
    }

    #[test]
    fn new_run_is_idle_and_sized() {
        let run = ScanRun::new(
            "192.168.1.0/30".parse().unwrap(),
            "20-22".parse().unwrap(),
        );
        assert_eq!(run.state(), RunState::Idle);
        assert!(!run.is_terminal());
        assert_eq!(run.total(), 12);
        assert_eq!(run.dispatched(), 0);
        assert_eq!(run.progress().total(), 12);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
