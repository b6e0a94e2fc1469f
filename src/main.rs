mod cli;
mod commands;
mod document;
mod markup;
mod model;
mod table;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inventory(args) => commands::inventory::run(args),
        Commands::Ciods(args) => commands::ciods::run(args),
        Commands::Modules(args) => commands::modules::run(args),
        Commands::NormalizeCiods(args) => commands::normalize::run_ciods(args),
        Commands::CiodModules(args) => commands::normalize::run_ciod_modules(args),
        Commands::ModuleAttributes(args) => commands::normalize::run_module_attributes(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
