mod classify;
mod cli;
mod error;
mod logging;
mod probe_pet;
mod screenshot;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let result = match &cli.command {
        Commands::Classify { status } => classify::execute(*status),
        Commands::ProbePet { id } => probe_pet::execute(&cli.config, *id),
        Commands::Screenshot { label, dir } => screenshot::execute(&cli.config, label, dir),
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "command failed");
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
