use std::net::Ipv4Addr;
use std::time::Duration;

use netsweep_common::config::Config;
use netsweep_common::network::{ports::PortRange, range::AddressSpace, target::Target};
use netsweep_core::scanner::{RunState, ScanEvent, ScanRun, Scanner};

use crate::utils::{self, LOOPBACK};

fn config() -> Config {
    Config {
        connect_timeout: Duration::from_millis(500),
        ..Config::default()
    }
}

async fn scan(network: &str, ports: PortRange) -> (ScanRun, Vec<ScanEvent>) {
    let network: AddressSpace = network.parse().unwrap();
    let scanner = Scanner::new(&config());

    let mut events = Vec::new();
    let mut observer = |event: ScanEvent| events.push(event);
    let run = scanner
        .execute(ScanRun::new(network, ports), &mut observer)
        .await
        .unwrap();
    (run, events)
}

#[tokio::test]
async fn listening_port_is_reported_once() {
    let (_listener, port) = utils::listening_port().await;
    let (run, events) = scan("127.0.0.1/32", PortRange::new(port, port).unwrap()).await;

    let target = Target::new(LOOPBACK, port);
    assert_eq!(run.state(), RunState::Completed);
    assert_eq!(run.open_ports(), [target]);
    assert_eq!(
        events,
        [ScanEvent::AddressStarted(LOOPBACK), ScanEvent::PortOpen(target)]
    );
}

#[tokio::test]
async fn refused_port_is_not_reported() {
    let port = utils::refused_port().await;
    let (run, events) = scan("127.0.0.1", PortRange::new(port, port).unwrap()).await;

    assert_eq!(run.state(), RunState::Completed);
    assert_eq!(run.completed(), 1);
    assert!(run.open_ports().is_empty());
    assert_eq!(events, [ScanEvent::AddressStarted(LOOPBACK)]);
}

#[tokio::test]
async fn every_address_of_the_block_is_visited() {
    let (_listener, port) = utils::listening_port().await;
    let (run, events) = scan("127.0.0.0/30", PortRange::new(port, port).unwrap()).await;

    assert_eq!(run.dispatched(), 4);
    assert_eq!(run.completed(), 4);
    assert_eq!(run.open_ports(), [Target::new(LOOPBACK, port)]);

    let started: Vec<Ipv4Addr> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::AddressStarted(addr) => Some(*addr),
            ScanEvent::PortOpen(_) => None,
        })
        .collect();
    assert_eq!(
        started,
        (0..4).map(|d| Ipv4Addr::new(127, 0, 0, d)).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn run_scan_returns_open_targets() {
    let (_listener, port) = utils::listening_port().await;

    let mut opened = Vec::new();
    let mut observer = |event: ScanEvent| {
        if let ScanEvent::PortOpen(target) = event {
            opened.push(target);
        }
    };
    let open = netsweep_core::run_scan("127.0.0.1/32", port, port, &mut observer)
        .await
        .unwrap();

    assert_eq!(open, [Target::new(LOOPBACK, port)]);
    assert_eq!(opened, open);
}
