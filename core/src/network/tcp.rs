use std::io;
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::network::target::Target;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Classification of one connection attempt.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The three-way handshake completed.
    Open(Target),
    /// Refused, reset or no answer within the connect timeout.
    ClosedOrFiltered(Target),
    /// Any other socket failure, e.g. an unreachable network or exhausted descriptors.
    Error(Target, io::Error),
}

impl ProbeOutcome {
    pub fn target(&self) -> Target {
        match self {
            Self::Open(target) | Self::ClosedOrFiltered(target) | Self::Error(target, _) => *target,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Performs a single connection attempt. Implementations must never panic on
/// transport failures; those are reported as [`ProbeOutcome::Error`].
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, target: Target) -> ProbeOutcome;
}

/// Full TCP connect probe. The socket is closed as soon as the handshake
/// completes, nothing is sent or read.
#[derive(Debug, Clone)]
pub struct TcpProber {
    connect_timeout: Duration,
}

impl TcpProber {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: Target) -> ProbeOutcome {
        match timeout(self.connect_timeout, TcpStream::connect(target.socket_addr())).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeOutcome::Open(target)
            }
            Ok(Err(err)) => classify_error(target, err),
            Err(_elapsed) => ProbeOutcome::ClosedOrFiltered(target),
        }
    }
}

fn classify_error(target: Target, err: io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::TimedOut => ProbeOutcome::ClosedOrFiltered(target),
        _ => ProbeOutcome::Error(target, err),
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
