use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::terminal::{format, print};
use netsweep_common::config::Config;
use netsweep_core::report;

pub fn read(file: &Path, cfg: &Config) -> anyhow::Result<()> {
    let targets = report::read_results_file(file)
        .with_context(|| format!("failed to read results from {}", file.display()))?;

    if targets.is_empty() {
        print::header("zero open ports", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("saved results", cfg.quiet);
    format::print_hosts(&targets);
    info!("{} open ports loaded from {}", targets.len(), file.display());
    Ok(())
}
