use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use colored::*;
use netsweep_common::network::target::Target;

use crate::terminal::{colors, print};

/// Groups open targets by address, both levels sorted ascending.
pub fn group_by_host(targets: &[Target]) -> BTreeMap<Ipv4Addr, Vec<u16>> {
    let mut hosts: BTreeMap<Ipv4Addr, Vec<u16>> = BTreeMap::new();
    for target in targets {
        hosts.entry(target.addr).or_default().push(target.port);
    }
    for ports in hosts.values_mut() {
        ports.sort_unstable();
        ports.dedup();
    }
    hosts
}

pub fn ports_to_detail(ports: &[u16]) -> Vec<(String, ColoredString)> {
    ports
        .iter()
        .map(|port| {
            let value: ColoredString = format!("{} {}", port.to_string().color(colors::PORT), "open".green())
                .color(colors::TEXT_DEFAULT);
            (String::from("TCP"), value)
        })
        .collect()
}

pub fn print_hosts(targets: &[Target]) {
    let hosts = group_by_host(targets);
    for (idx, (addr, ports)) in hosts.iter().enumerate() {
        print::tree_head(idx, &addr.to_string().color(colors::IPV4_ADDR).to_string());
        print::as_tree_one_level(ports_to_detail(ports));
        if idx + 1 != hosts.len() {
            print::print("");
        }
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
