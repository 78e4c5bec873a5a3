use std::net::Ipv4Addr;

use netsweep_common::network::target::Target;

/// Progress notification delivered to a [`ScanObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    /// Emitted once per address, before any of its ports are probed.
    AddressStarted(Ipv4Addr),
    /// Emitted once per newly discovered open port, after its probe finished.
    PortOpen(Target),
}

/// Receiver of [`ScanEvent`]s.
///
/// The scanner calls the observer from a single dispatch loop, never from
/// the probe workers, so implementations need no synchronisation.
pub trait ScanObserver {
    fn on_event(&mut self, event: ScanEvent);
}

impl<F> ScanObserver for F
where
    F: FnMut(ScanEvent),
{
    fn on_event(&mut self, event: ScanEvent) {
        self(event)
    }
}
