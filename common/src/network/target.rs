//! # Scan Target Model
//!
//! A [`Target`] is one `(address, port)` coordinate of the scan space.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// One coordinate of the scan space. Ordered by address, then port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl Target {
    pub fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.addr, self.port))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

impl From<SocketAddrV4> for Target {
    fn from(value: SocketAddrV4) -> Self {
        Self::new(*value.ip(), value.port())
    }
}
