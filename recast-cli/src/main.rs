//! Binary entry point: parse arguments, dispatch, map errors to exit codes.

use clap::Parser;
use console::style;
use recast_cli::{Cli, Commands, commands, logging};
use std::process;

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
    };

    match result {
        Ok(_) => {
            // Per-file failures are reported in the summary and the error
            // report; a run that completed still exits 0.
            println!("{}", style("Batch complete.").green().bold());
        }
        Err(e) => {
            log::error!("Fatal: {e}");
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(1);
        }
    }
}
