use std::cell::Cell;

use crate::terminal::{colors, logging::PRINT_TARGET};
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;

thread_local! {
    pub static GLOBAL_KEY_WIDTH: Cell<usize> = const { Cell::new(0) }
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

/// Splits the padding around `label` so the whole line is [`TOTAL_WIDTH`] wide.
fn padding(label: &str) -> (usize, usize) {
    let fill = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(label));
    let left = fill / 2;
    (left, fill - left)
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }

    let label = format!("⟦ NETSWEEP v{} ⟧", env!("CARGO_PKG_VERSION"));
    let (left, right) = padding(&label);
    print(&format!(
        "{}{}{}",
        "═".repeat(left).bright_black(),
        label.bright_green().bold(),
        "═".repeat(right).bright_black()
    ));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let label = format!("⟦ {} ⟧", msg.to_uppercase());
    let (left, right) = padding(&label);
    print(&format!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        label.bright_green(),
        "─".repeat(right).bright_black()
    ));
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

/// Sets the key column width used by [`aligned_line`] on this thread.
pub fn set_key_width(keys: &[&str]) {
    let width: usize = keys.iter().map(|k| k.len()).max().unwrap_or(0);
    GLOBAL_KEY_WIDTH.set(width);
}

pub fn aligned_line(key: &str, value: impl AsRef<str>) {
    let dots: String = ".".repeat((GLOBAL_KEY_WIDTH.get() + 1).saturating_sub(key.len()));
    print_status(format!(
        "{}{}{} {}",
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value.as_ref().color(colors::TEXT_DEFAULT)
    ));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT)));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    let count = key_value_pair.len();
    for (i, (key, value)) in key_value_pair.into_iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let dots: String = ".".repeat(7usize.saturating_sub(key.len()));
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

/// Frames `lines` in a box centred within [`TOTAL_WIDTH`].
fn framed(lines: &[&str]) -> Vec<String> {
    let inner = lines.iter().map(|l| UnicodeWidthStr::width(*l)).max().unwrap_or(0) + 4;
    let indent = " ".repeat(TOTAL_WIDTH.saturating_sub(inner + 2) / 2);

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("{indent}┌{}┐", "─".repeat(inner)));
    for line in lines {
        let (left, right) = {
            let fill = inner - UnicodeWidthStr::width(*line);
            (fill / 2, fill - fill / 2)
        };
        out.push(format!("{indent}│{}{line}{}│", " ".repeat(left), " ".repeat(right)));
    }
    out.push(format!("{indent}└{}┘", "─".repeat(inner)));
    out
}

pub fn no_results() {
    for line in framed(&["NO OPEN PORTS", "every probe was refused or timed out"]) {
        print(&line.red().bold().to_string());
    }
}

pub fn end_of_program(q_level: u8) {
    if q_level > 1 {
        return;
    }
    fat_separator();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
