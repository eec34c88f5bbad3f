use std::process::ExitCode;

use buildcommon::prelude::*;

use clap::Parser;

mod cli;
mod cmd_build;
mod cmd_checkenv;
mod cmd_clean;
mod cmd_init;
mod error;

use cli::{Cli, Command};
use error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.apply_print_options();

    match main_internal(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.is_trace_on() {
                eprintln!("error: {:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn main_internal(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Command::Init(options) => cmd_init::run(options),
        Command::Build(options) => cmd_build::run(&cli.top, options),
        Command::Clean(options) => cmd_clean::run(&cli.top, options),
        Command::Checkenv(_) => cmd_checkenv::run(&cli.top),
    }
}
