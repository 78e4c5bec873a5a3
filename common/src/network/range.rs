//! # Address Space
//!
//! Expansion of an IPv4 CIDR block into the concrete addresses it covers.
//!
//! Every address of the block is yielded, including the network and the
//! broadcast address, in ascending numeric order.

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressSpace {
    network: Ipv4Network,
}

impl AddressSpace {
    /// Builds the block `ip/prefix`. `ip` must be the network address itself;
    /// an address with host bits set is rejected.
    pub fn new(ip: Ipv4Addr, prefix: u8) -> Result<Self, ScanError> {
        let spec = format!("{ip}/{prefix}");
        let network = Ipv4Network::new(ip, prefix).map_err(|e| ScanError::network(&spec, e))?;
        if network.network() != ip {
            return Err(ScanError::network(
                &spec,
                format!("host bits set, did you mean {}/{prefix}?", network.network()),
            ));
        }
        Ok(Self { network })
    }

    pub fn network(&self) -> Ipv4Network {
        self.network
    }

    pub fn first(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn last(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    /// Number of addresses in the block, `2^32` for a `/0`.
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.last())) - u64::from(u32::from(self.first())) + 1
    }

    /// A block always holds at least one address.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> Addresses {
        let start: u32 = self.first().into();
        let end: u32 = self.last().into();
        Addresses { inner: start..=end }
    }
}

impl FromStr for AddressSpace {
    type Err = ScanError;

    /// Parses `a.b.c.d/prefix`. A bare address is treated as a `/32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (ip_str, prefix_str) = match s.split_once('/') {
            Some((ip_str, prefix_str)) => (ip_str, Some(prefix_str)),
            None => (s, None),
        };

        let ip = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|e| ScanError::network(s, format!("bad address '{ip_str}': {e}")))?;

        let prefix: u8 = match prefix_str {
            None => 32,
            Some(p) if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(ScanError::network(s, format!("bad prefix length '{p}'")));
            }
            Some(p) => p
                .parse::<u8>()
                .map_err(|e| ScanError::network(s, format!("bad prefix length '{p}': {e}")))?,
        };

        if prefix > 32 {
            return Err(ScanError::network(s, format!("prefix length {prefix} exceeds 32")));
        }

        Self::new(ip, prefix)
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

/// Iterator over the addresses of an [`AddressSpace`].
#[derive(Debug, Clone)]
pub struct Addresses {
    inner: RangeInclusive<u32>,
}

impl Iterator for Addresses {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Ipv4Addr::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl IntoIterator for &AddressSpace {
    type Item = Ipv4Addr;
    type IntoIter = Addresses;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
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

    fn parse(s: &str) -> AddressSpace {
        s.parse().unwrap()
    }

    #[test]
    fn slash_30_yields_all_four_addresses_in_order() {
        let addrs: Vec<String> = parse("192.168.1.0/30").iter().map(|a| a.to_string()).collect();
        assert_eq!(
            addrs,
            ["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"]
        );
    }

    #[test]
    fn iteration_is_restartable() {
        let space = parse("10.0.0.0/29");
        let first: Vec<Ipv4Addr> = space.iter().collect();
        let second: Vec<Ipv4Addr> = (&space).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn host_bits_are_rejected() {
        for bad in ["192.168.1.7/30", "172.16.5.10/20", "10.20.30.40/0"] {
            let result = bad.parse::<AddressSpace>();
            assert!(
                matches!(result, Err(ScanError::InvalidNetworkSpec { .. })),
                "{bad:?} should be rejected, got {result:?}"
            );
        }
        assert_eq!(parse("172.16.0.0/20").last(), Ipv4Addr::new(172, 16, 15, 255));
    }

    #[test]
    fn bare_address_is_single_host() {
        let space = parse("203.0.113.7");
        assert_eq!(space.len(), 1);
        assert_eq!(space.iter().collect::<Vec<_>>(), [Ipv4Addr::new(203, 0, 113, 7)]);
    }

    #[test]
    fn prefix_0_covers_whole_space() {
        let space = parse("0.0.0.0/0");
        assert_eq!(space.first(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(space.last(), Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(space.len(), 1 << 32);
    }

    #[test]
    fn len_matches_iteration() {
        let space = parse("192.168.0.0/23");
        assert_eq!(space.len(), 512);
        assert_eq!(space.iter().count() as u64, space.len());
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in [
            "999.1.2.3/24",
            "192.168.0.1/33",
            "192.168.0.1/",
            "192.168.0.1/-1",
            "192.168.0.1/24/8",
            "192.168.0/24",
            "192.168.0.1\\24",
            "not-an-ip",
            "",
        ] {
            let result = bad.parse::<AddressSpace>();
            assert!(
                matches!(result, Err(ScanError::InvalidNetworkSpec { .. })),
                "{bad:?} should be rejected, got {result:?}"
            );
        }
    }
}
