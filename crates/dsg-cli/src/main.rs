//! `dsg` command line tool.

use clap::Parser;
use dsg_cli::logging::init_logging;
use dsg_validate::CheckStatus;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{run_crossover, run_inspect, run_standardize, run_types, run_update_flags};
use crate::summary::{
    print_crossover_summary, print_flag_summary, print_inspect_summary, print_standardize_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Types(args) => run_types(args).map(|()| 0),
        Command::Standardize(args) => run_standardize(args).map(|result| {
            print_standardize_summary(&result);
            i32::from(result.status == CheckStatus::Unacceptable)
        }),
        Command::Inspect(args) => run_inspect(args).map(|result| {
            print_inspect_summary(&result);
            0
        }),
        Command::Crossover(args) => run_crossover(args).map(|result| {
            print_crossover_summary(&result);
            0
        }),
        Command::UpdateFlags(args) => run_update_flags(args).map(|result| {
            print_flag_summary(&result);
            0
        }),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
