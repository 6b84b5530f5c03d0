//! Command-line entry point for the `modblur` installer.

use std::process::ExitCode;

use clap::Parser;

use modblur_cli::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);

    match commands::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
