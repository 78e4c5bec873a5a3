use thiserror::Error;

/// Errors that prevent a scan from starting.
///
/// Transport failures of individual probes never end up here, they are
/// contained by the scanner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid network '{spec}': {reason}")]
    InvalidNetworkSpec { spec: String, reason: String },
    #[error("invalid port range '{spec}': {reason}")]
    InvalidPortRange { spec: String, reason: String },
    #[error("scan run has already been executed")]
    RunNotIdle,
}

impl ScanError {
    pub(crate) fn network(spec: &str, reason: impl ToString) -> Self {
        Self::InvalidNetworkSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn ports(spec: &str, reason: impl ToString) -> Self {
        Self::InvalidPortRange {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}
