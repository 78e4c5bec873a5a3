use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::commands::ScanArgs;
use crate::terminal::{colors, format, input, input::InputHandle, print, spinner};
use netsweep_common::config::Config;
use netsweep_common::network::target::Target;
use netsweep_core::report::{ResultSink, TextSink};
use netsweep_core::scanner::{CancelToken, RunState, ScanEvent, ScanObserver, ScanRun, Scanner};

/// Prints progress as the scanner reports it.
struct ConsoleObserver {
    quiet: u8,
}

impl ConsoleObserver {
    /// `-q` only hides headers, `-qq` also hides per-address lines.
    fn announces_addresses(&self) -> bool {
        self.quiet < 2
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::AddressStarted(addr) => {
                if self.announces_addresses() {
                    print::print_status(format!("Scanning {addr}"));
                }
            }
            ScanEvent::PortOpen(target) => {
                info!(
                    "Port {} is open on {}",
                    target.port.to_string().color(colors::PORT).bold(),
                    target.addr.to_string().color(colors::IPV4_ADDR)
                );
            }
        }
    }
}

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let run = ScanRun::new(args.network, args.ports);
    print_parameters(&run, cfg);

    let scanner = Scanner::new(cfg);
    let cancel = scanner.cancel_token();

    let mut input = InputHandle::new();
    if !cfg.disable_input {
        input.start(cancel.clone());
    }
    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let interrupt = spawn_interrupt_handler(cancel.clone(), running.clone());

    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&spinner::scan_style()?);

    let progress_handle =
        spinner::start_scan_progress(span.clone(), run.progress(), running.clone(), !cfg.disable_input);

    let start_time: Instant = Instant::now();
    let mut observer = ConsoleObserver { quiet: cfg.quiet };
    let result = scanner.execute(run, &mut observer).instrument(span.clone()).await;

    running.store(false, Ordering::Relaxed);
    let _ = progress_handle.join();
    drop(input);
    drop(span);

    let run: ScanRun = result?;
    let open: Vec<Target> = run.open_ports();

    if run.state() == RunState::Cancelled {
        warn!(
            "Scan cancelled after {} of {} probes",
            run.completed(),
            run.total()
        );
    }

    scan_ends(&run, &open, start_time.elapsed(), cfg);

    if let Some(path) = &args.output {
        TextSink::create(path)
            .and_then(|mut sink| sink.write_results(&open))
            .with_context(|| format!("failed to save results to {}", path.display()))?;
        info!("Saved {} results to {}", open.len(), path.display());
    }

    interrupt.abort();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    CancelScan,
    Exit,
}

/// The first Ctrl-C during the scan cancels it. Any later one, or one that
/// arrives after the scan finished, ends the process.
fn on_interrupt(scanning: bool, cancel: &CancelToken) -> Interrupt {
    if scanning && !cancel.is_cancelled() {
        Interrupt::CancelScan
    } else {
        Interrupt::Exit
    }
}

fn spawn_interrupt_handler(cancel: CancelToken, running: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(running.load(Ordering::Relaxed), &cancel) {
                Interrupt::CancelScan => {
                    warn!("Interrupted, waiting for in-flight probes");
                    cancel.cancel();
                }
                Interrupt::Exit => {
                    input::restore_terminal();
                    warn!("Interrupted");
                    std::process::exit(130);
                }
            }
        }
    })
}

fn print_parameters(run: &ScanRun, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    print::set_key_width(&["Network", "Ports", "Probes", "Workers", "Timeout"]);
    print::aligned_line("Network", run.network().to_string());
    print::aligned_line("Ports", run.ports().to_string());
    print::aligned_line("Probes", run.total().to_string());
    print::aligned_line("Workers", cfg.pool_size.to_string());
    print::aligned_line("Timeout", format!("{}ms", cfg.connect_timeout.as_millis()));
}

fn scan_ends(run: &ScanRun, open: &[Target], total_time: Duration, cfg: &Config) {
    if open.is_empty() {
        print::header("zero open ports", cfg.quiet);
        if cfg.quiet < 2 {
            print::no_results();
        }
        return;
    }

    print::header("scan results", cfg.quiet);
    if cfg.quiet < 2 {
        format::print_hosts(open);
    }
    print_summary(run, open, total_time, cfg);
}

fn print_summary(run: &ScanRun, open: &[Target], total_time: Duration, cfg: &Config) {
    let hosts: usize = format::group_by_host(open).len();
    let open_ports: ColoredString = format!("{} open ports", open.len()).bold().green();
    let host_count: ColoredString = format!("{hosts} {}", plural(hosts, "host", "hosts")).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!(
        "Scan Complete: {open_ports} on {host_count} in {total_time}"
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
            print::aligned_line("Scanned", scanned_summary(run));
        }
        _ => info!("{}", output),
    }
}

fn scanned_summary(run: &ScanRun) -> String {
    let first: Ipv4Addr = run.network().first();
    let last: Ipv4Addr = run.network().last();
    format!("{first} - {last}, {} of {} probes", run.completed(), run.total())
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
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

    #[test]
    fn single_quiet_flag_keeps_address_lines() {
        assert!(ConsoleObserver { quiet: 0 }.announces_addresses());
        assert!(ConsoleObserver { quiet: 1 }.announces_addresses());
        assert!(!ConsoleObserver { quiet: 2 }.announces_addresses());
    }

    #[test]
    fn first_interrupt_cancels_running_scan() {
        let cancel = CancelToken::new();
        assert_eq!(on_interrupt(true, &cancel), Interrupt::CancelScan);
    }

    #[test]
    fn second_interrupt_exits() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(on_interrupt(true, &cancel), Interrupt::Exit);
    }

    #[test]
    fn interrupt_after_scan_exits() {
        let cancel = CancelToken::new();
        assert_eq!(on_interrupt(false, &cancel), Interrupt::Exit);
    }
}
