use anyhow::Result;
use clap::Parser;

use footprint::cli::{Cli, Commands};
use footprint::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Train(args) => commands::train::run(&cli, args),
        Commands::Predict(args) => commands::predict::run(&cli, args),
        Commands::Schema(args) => commands::schema::run(&cli, args),
    }
}
