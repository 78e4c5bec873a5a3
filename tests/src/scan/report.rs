use std::collections::HashSet;

use netsweep_common::network::{ports::PortRange, target::Target};
use netsweep_core::report::{self, ResultSink, TextSink};
use netsweep_core::scanner::{ScanEvent, ScanRun, Scanner};
use netsweep_common::config::Config;

use crate::utils::{self, LOOPBACK};

#[tokio::test]
async fn saved_results_read_back_identically() -> anyhow::Result<()> {
    let (_first, first_port) = utils::listening_port().await;
    let (_second, second_port) = utils::listening_port().await;

    let scanner = Scanner::new(&Config::default());
    let mut open: Vec<Target> = Vec::new();
    for port in [first_port, second_port] {
        let run = ScanRun::new("127.0.0.1/32".parse()?, PortRange::new(port, port)?);
        let mut observer = |_: ScanEvent| {};
        open.extend(scanner.execute(run, &mut observer).await?.open_ports());
    }
    assert_eq!(open.len(), 2);

    let file = tempfile::NamedTempFile::new()?;
    TextSink::create(file.path())?.write_results(&open)?;

    let text = std::fs::read_to_string(file.path())?;
    assert!(text.contains(&format!("{LOOPBACK} open on {first_port}\n")));
    assert!(text.contains(&format!("{LOOPBACK} open on {second_port}\n")));

    let read: HashSet<Target> = report::read_results_file(file.path())?.into_iter().collect();
    assert_eq!(read, open.into_iter().collect::<HashSet<_>>());
    Ok(())
}
