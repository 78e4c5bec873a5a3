pub mod read;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use netsweep_common::config::{Config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POOL_SIZE};
use netsweep_common::network::{ports::PortRange, range::AddressSpace};

#[derive(Parser)]
#[command(name = "netsweep")]
#[command(about = "A concurrent TCP connect scanner.", version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat to only print findings and errors
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not listen for 'q' to stop a scan early
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every address of a network for open TCP ports
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Print a saved result file
    #[command(alias = "r")]
    Read { file: PathBuf },
}

#[derive(Args)]
pub struct ScanArgs {
    /// Network in CIDR notation, e.g. 192.168.1.0/24
    pub network: AddressSpace,

    /// Inclusive port range, e.g. 20-443
    #[arg(short, long, default_value = "1-1024")]
    pub ports: PortRange,

    /// Save open ports to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of connection attempts in flight
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_POOL_SIZE as u32,
        value_parser = clap::value_parser!(u32).range(1..=10_000)
    )]
    pub concurrency: u32,

    /// Connect timeout per probe, in milliseconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,
}

impl ScanArgs {
    pub fn apply(&self, cfg: Config) -> Config {
        Config {
            pool_size: self.concurrency as usize,
            connect_timeout: Duration::from_millis(self.timeout_ms),
            ..cfg
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
