mod commands;
mod terminal;

use std::io::IsTerminal;

use commands::{CommandLine, Commands, read, scan};
use netsweep_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();
    print::banner(commands.quiet);

    let cfg = Config {
        quiet: commands.quiet,
        disable_input: commands.no_input
            || !std::io::stdin().is_terminal()
            || !std::io::stderr().is_terminal(),
        ..Config::default()
    };

    let result = match commands.command {
        Commands::Scan(args) => {
            let cfg = args.apply(cfg);
            print::header("starting scanner", cfg.quiet);
            scan::scan(args, &cfg).await
        }
        Commands::Read { file } => {
            print::header("reading results", cfg.quiet);
            read::read(&file, &cfg)
        }
    };

    print::end_of_program(commands.quiet);
    result
}
