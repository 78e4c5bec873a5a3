use std::time::Duration;

/// Maximum number of connection probes in flight at once.
pub const DEFAULT_POOL_SIZE: usize = 100;
/// How long a single TCP connect may take before the port counts as filtered.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    /// Size of the worker pool shared by every address batch of a run.
    pub pool_size: usize,
    pub connect_timeout: Duration,
    /// 0 prints everything, 1 drops headers, 2 prints only findings and errors.
    pub quiet: u8,
    /// Disables the key listener that lets the user stop a scan early.
    pub disable_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            quiet: 0,
            disable_input: false,
        }
    }
}
