use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use colored::*;
use indicatif::ProgressStyle;
use netsweep_core::scanner::ScanProgress;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const TIP: &str = "You can press 'q' to finish early";

pub fn scan_style() -> anyhow::Result<ProgressStyle> {
    let style = ProgressStyle::with_template(
        "{spinner:.blue} [{bar:32.green/bright_black}] {pos}/{len} probes {msg}",
    )?
    .progress_chars("━╸━")
    .tick_strings(&[
        "▁▁▁▁▁",
        "▁▂▂▂▁",
        "▁▄▂▄▁",
        "▂▄▆▄▂",
        "▄▆█▆▄",
        "▂▄▆▄▂",
        "▁▄▂▄▁",
        "▁▂▂▂▁",
    ]);
    Ok(style)
}

/// Mirrors the run's counters onto the span's progress bar until `running` is cleared.
pub fn start_scan_progress(
    span: Span,
    progress: ScanProgress,
    running: Arc<AtomicBool>,
    show_tip: bool,
) -> JoinHandle<()> {
    span.pb_set_length(progress.total());

    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            refresh(&span, &progress, show_tip);
            thread::sleep(REFRESH_INTERVAL);
        }
        refresh(&span, &progress, false);
    })
}

fn refresh(span: &Span, progress: &ScanProgress, show_tip: bool) {
    span.pb_set_position(progress.completed());

    let open: ColoredString = format!("{} open", progress.open()).green().bold();
    let msg: String = if show_tip {
        format!("· {open} · {}", TIP.italic().white())
    } else {
        format!("· {open}")
    };
    span.pb_set_message(&msg);
}
