//! The central **scheduler** for TCP connect scans.
//!
//! A run walks its [`AddressSpace`] one address at a time. For every address it
//! emits [`ScanEvent::AddressStarted`], dispatches one probe per port into a
//! bounded pool shared by the whole run, and waits until that batch has fully
//! drained before moving on. Open ports are recorded in the run and reported as
//! [`ScanEvent::PortOpen`].
//!
//! Events flow from the workers over a channel to one dispatch loop that owns the
//! observer. Because `AddressStarted` is queued on the same channel before the
//! batch is spawned, the observer never sees an address start before every
//! result of the previous address.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use netsweep_common::config::Config;
use netsweep_common::error::ScanError;
use netsweep_common::network::{ports::PortRange, range::AddressSpace, target::Target};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use crate::network::tcp::{ProbeOutcome, Prober, TcpProber};

mod event;
mod run;

pub use event::{ScanEvent, ScanObserver};
pub use run::{CancelToken, RunState, ScanProgress, ScanRun};
use run::RunShared;

/// Scans `network_cidr` on `start_port..=end_port` with the default pool size and
/// connect timeout, returning the open targets in completion order.
///
/// Fails before any probe is sent if the network or the port bounds are invalid.
pub async fn run_scan<O: ScanObserver>(
    network_cidr: &str,
    start_port: u16,
    end_port: u16,
    observer: &mut O,
) -> Result<Vec<Target>, ScanError> {
    let network: AddressSpace = network_cidr.parse()?;
    let ports = PortRange::new(start_port, end_port)?;

    let scanner = Scanner::new(&Config::default());
    let run = scanner.execute(ScanRun::new(network, ports), observer).await?;
    Ok(run.open_ports())
}

pub struct Scanner<P = TcpProber> {
    prober: Arc<P>,
    pool_size: usize,
    cancel: CancelToken,
}

impl Scanner<TcpProber> {
    pub fn new(cfg: &Config) -> Self {
        Self::with_prober(TcpProber::new(cfg.connect_timeout), cfg.pool_size)
    }
}

impl<P: Prober> Scanner<P> {
    /// A pool size of zero is raised to one.
    pub fn with_prober(prober: P, pool_size: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            pool_size: pool_size.max(1),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Executes `run` to completion or cancellation and hands it back.
    ///
    /// The observer is driven on the caller's task while the probes run on the
    /// tokio runtime.
    pub async fn execute<O: ScanObserver>(
        &self,
        mut run: ScanRun,
        observer: &mut O,
    ) -> Result<ScanRun, ScanError> {
        if run.state() != RunState::Idle {
            return Err(ScanError::RunNotIdle);
        }
        run.set_state(RunState::Running);
        debug!(
            network = %run.network(),
            ports = %run.ports(),
            pool_size = self.pool_size,
            "scan started"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (finished, ()) = tokio::join!(
            self.schedule(&run, events_tx),
            dispatch_events(events_rx, observer)
        );

        let state = if finished { RunState::Completed } else { RunState::Cancelled };
        run.set_state(state);
        debug!(
            ?state,
            dispatched = run.dispatched(),
            completed = run.completed(),
            open = run.open_ports().len(),
            "scan finished"
        );
        Ok(run)
    }

    /// Returns `false` if the run was cancelled before every batch was dispatched.
    async fn schedule(&self, run: &ScanRun, events: UnboundedSender<ScanEvent>) -> bool {
        let pool = Arc::new(Semaphore::new(self.pool_size));
        let shared = run.shared();

        for address in run.network() {
            if self.cancel.is_cancelled() {
                return false;
            }
            let _ = events.send(ScanEvent::AddressStarted(address));
            if !self.scan_batch(address, run.ports(), &pool, &shared, &events).await {
                return false;
            }
        }
        true
    }

    /// Probes every port of `address` and waits for the whole batch to drain.
    async fn scan_batch(
        &self,
        address: Ipv4Addr,
        ports: &PortRange,
        pool: &Arc<Semaphore>,
        shared: &Arc<RunShared>,
        events: &UnboundedSender<ScanEvent>,
    ) -> bool {
        let mut batch: JoinSet<()> = JoinSet::new();
        let mut dispatched_all = true;

        for port in ports {
            if self.cancel.is_cancelled() {
                dispatched_all = false;
                break;
            }
            let Ok(permit) = Arc::clone(pool).acquire_owned().await else {
                dispatched_all = false;
                break;
            };

            let target = Target::new(address, port);
            let prober = Arc::clone(&self.prober);
            let shared = Arc::clone(shared);
            let events = events.clone();

            shared.dispatched.fetch_add(1, Ordering::AcqRel);
            batch.spawn(async move {
                let _permit = permit;
                let outcome = prober.probe(target).await;
                record_outcome(outcome, &shared, &events);
                shared.completed.fetch_add(1, Ordering::AcqRel);
            });
        }

        while let Some(joined) = batch.join_next().await {
            if let Err(e) = joined {
                error!("probe task on {address} failed: {e}");
                shared.completed.fetch_add(1, Ordering::AcqRel);
            }
        }

        dispatched_all
    }
}

fn record_outcome(outcome: ProbeOutcome, shared: &RunShared, events: &UnboundedSender<ScanEvent>) {
    match outcome {
        ProbeOutcome::Open(target) => {
            if shared.open.insert(target) {
                let _ = events.send(ScanEvent::PortOpen(target));
            }
        }
        ProbeOutcome::ClosedOrFiltered(target) => {
            trace!(%target, "closed or filtered");
        }
        ProbeOutcome::Error(target, err) => {
            debug!(%target, error = %err, "probe failed");
        }
    }
}

async fn dispatch_events<O: ScanObserver>(mut events: UnboundedReceiver<ScanEvent>, observer: &mut O) {
    while let Some(event) = events.recv().await {
        observer.on_event(event);
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
