//! # Result File
//!
//! Plain text persistence of open targets, one `"<address> open on <port>"`
//! line per target. No header, no trailer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::Ipv4Addr;
use std::path::Path;

use netsweep_common::network::target::Target;
use thiserror::Error;

const SEPARATOR: &str = " open on ";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected '<address> open on <port>', found '{content}'")]
    Malformed { line: usize, content: String },
}

/// Consumer of a finished run's open targets.
pub trait ResultSink {
    fn write_results(&mut self, targets: &[Target]) -> Result<(), ReportError>;
}

/// Writes the line format to any [`Write`].
pub struct TextSink<W: Write> {
    writer: W,
}

impl TextSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn write_results(&mut self, targets: &[Target]) -> Result<(), ReportError> {
        for target in targets {
            writeln!(self.writer, "{}", format_line(target))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn format_line(target: &Target) -> String {
    format!("{}{SEPARATOR}{}", target.addr, target.port)
}

pub fn parse_line(line: &str) -> Option<Target> {
    let (addr, port) = line.trim().split_once(SEPARATOR)?;
    let addr = addr.trim().parse::<Ipv4Addr>().ok()?;
    let port = port.trim().parse::<u16>().ok().filter(|p| *p != 0)?;
    Some(Target::new(addr, port))
}

/// Reads a result file back. Blank lines are skipped.
pub fn read_results<R: BufRead>(reader: R) -> Result<Vec<Target>, ReportError> {
    let mut targets = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let target = parse_line(&line).ok_or_else(|| ReportError::Malformed {
            line: idx + 1,
            content: line.clone(),
        })?;
        targets.push(target);
    }
    Ok(targets)
}

pub fn read_results_file(path: impl AsRef<Path>) -> Result<Vec<Target>, ReportError> {
    let file = File::open(path)?;
    read_results(BufReader::new(file))
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
    use std::collections::HashSet;
    use std::io::Cursor;

    fn targets() -> Vec<Target> {
        vec![
            Target::new(Ipv4Addr::new(192, 168, 1, 1), 22),
            Target::new(Ipv4Addr::new(192, 168, 1, 1), 80),
            Target::new(Ipv4Addr::new(10, 0, 0, 5), 443),
        ]
    }

    #[test]
    fn writes_one_line_per_target() {
        let mut sink = TextSink::new(Vec::new());
        sink.write_results(&targets()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "192.168.1.1 open on 22\n192.168.1.1 open on 80\n10.0.0.5 open on 443\n"
        );
    }

    #[test]
    fn empty_result_set_writes_nothing() {
        let mut sink = TextSink::new(Vec::new());
        sink.write_results(&[]).unwrap();
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn file_round_trip_preserves_targets() {
        let file = tempfile::NamedTempFile::new().unwrap();
        TextSink::create(file.path()).unwrap().write_results(&targets()).unwrap();

        let read: HashSet<Target> = read_results_file(file.path()).unwrap().into_iter().collect();
        assert_eq!(read, targets().into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn reader_skips_blank_lines() {
        let input = "\n10.0.0.1 open on 8080\n\n   \n10.0.0.2 open on 21\n";
        let read = read_results(Cursor::new(input)).unwrap();
        assert_eq!(
            read,
            [
                Target::new(Ipv4Addr::new(10, 0, 0, 1), 8080),
                Target::new(Ipv4Addr::new(10, 0, 0, 2), 21),
            ]
        );
    }

    #[test]
    fn reader_reports_malformed_line_number() {
        let input = "10.0.0.1 open on 22\nPort 80 is open on 10.0.0.1\n";
        match read_results(Cursor::new(input)) {
            Err(ReportError::Malformed { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "Port 80 is open on 10.0.0.1");
            }
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn parse_line_rejects_bad_fields() {
        assert_eq!(parse_line("10.0.0.1 open on 0"), None);
        assert_eq!(parse_line("10.0.0.1 open on 70000"), None);
        assert_eq!(parse_line("10.0.0.300 open on 22"), None);
        assert_eq!(parse_line("10.0.0.1 closed on 22"), None);
    }
}
