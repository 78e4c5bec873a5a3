use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ScanError;

/// An inclusive, non-empty range of TCP ports within `1..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ScanError> {
        let spec = format!("{start}-{end}");
        if start == 0 || end == 0 {
            return Err(ScanError::ports(&spec, "port 0 is not scannable"));
        }
        if start > end {
            return Err(ScanError::ports(&spec, "start port is greater than end port"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl FromStr for PortRange {
    type Err = ScanError;

    /// Parses `"start-end"`, e.g. `"20-22"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').map(str::trim).collect();
        let [start_str, end_str] = parts.as_slice() else {
            return Err(ScanError::ports(s, "expected exactly two ports separated by '-'"));
        };

        let start = parse_port(start_str, s)?;
        let end = parse_port(end_str, s)?;

        Self::new(start, end).map_err(|e| match e {
            ScanError::InvalidPortRange { reason, .. } => ScanError::ports(s, reason),
            other => other,
        })
    }
}

fn parse_port(part: &str, original: &str) -> Result<u16, ScanError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScanError::ports(original, format!("'{part}' is not a port number")));
    }
    let value: u32 = part
        .parse()
        .map_err(|e| ScanError::ports(original, format!("'{part}' is not a port number: {e}")))?;

    match u16::try_from(value) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(ScanError::ports(
            original,
            format!("{value} is outside 1-65535"),
        )),
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl IntoIterator for &PortRange {
    type Item = u16;
    type IntoIter = RangeInclusive<u16>;

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
